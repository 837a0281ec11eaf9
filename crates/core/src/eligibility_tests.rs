use super::*;
use crate::post::GenderRestriction;
use crate::role::RoleGrant;
use crate::user::Gender;
use chrono::TimeZone;

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, d).unwrap()
}

fn make_user(id: &str) -> User {
    User::new(id, "Silva", "2", 2025, "infantry", Gender::Male)
}

fn make_post() -> Post {
    Post::new("p-1", "Main Gate", ["1", "2"])
}

struct Fixture {
    user: User,
    post: Post,
    grants: Vec<RoleGrant>,
    windows: Vec<UnavailabilityWindow>,
    existing: Option<Allocation>,
    presence: PresenceStatus,
}

impl Fixture {
    fn new() -> Self {
        Self {
            user: make_user("u-1"),
            post: make_post(),
            grants: Vec::new(),
            windows: Vec::new(),
            existing: None,
            presence: PresenceStatus::Present,
        }
    }

    fn check(&self, exempt: Option<&AllocationId>) -> Verdict {
        EligibilityCheck {
            user: &self.user,
            post: &self.post,
            date: date(22),
            grants: &self.grants,
            windows: &self.windows,
            existing: self.existing.as_ref(),
            exempt,
            presence: self.presence,
        }
        .evaluate()
    }
}

#[test]
fn clean_candidate_is_eligible() {
    let fixture = Fixture::new();
    let verdict = fixture.check(None);
    assert!(verdict.eligible());
    assert!(verdict.reasons.is_empty());
}

#[test]
fn gender_restriction_fails() {
    let mut fixture = Fixture::new();
    fixture.post = fixture.post.with_gender(GenderRestriction::Female);

    let verdict = fixture.check(None);
    assert_eq!(verdict.reasons, vec![IneligibleReason::GenderRestricted]);
}

#[test]
fn cohort_mismatch_fails() {
    let mut fixture = Fixture::new();
    fixture.user.cohort = "3".to_string();

    let verdict = fixture.check(None);
    assert_eq!(verdict.reasons, vec![IneligibleReason::CohortNotPermitted]);
    assert_eq!(verdict.summary(), "cohort mismatch");
}

#[test]
fn missing_required_role_fails() {
    let mut fixture = Fixture::new();
    fixture.post = fixture.post.with_required_role("armorer");

    let verdict = fixture.check(None);
    assert_eq!(
        verdict.reasons,
        vec![IneligibleReason::MissingRole {
            role: "armorer".to_string()
        }]
    );
}

#[test]
fn permanent_role_grant_satisfies_requirement() {
    let mut fixture = Fixture::new();
    fixture.post = fixture.post.with_required_role("armorer");
    fixture.grants.push(RoleGrant::permanent("g-1", "u-1", "ARMORER"));

    assert!(fixture.check(None).eligible());
}

#[test]
fn temporary_role_grant_must_cover_start_of_day() {
    let mut fixture = Fixture::new();
    fixture.post = fixture.post.with_required_role("duty-officer");

    // Window opens at 06:00 on the duty date; start-of-day is outside it
    fixture.grants.push(RoleGrant::temporary(
        "g-1",
        "u-1",
        "duty-officer",
        Utc.with_ymd_and_hms(2025, 10, 22, 6, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2025, 10, 23, 0, 0, 0).unwrap(),
    ));
    assert!(!fixture.check(None).eligible());

    // Window covering the whole date passes
    fixture.grants[0] = RoleGrant::temporary(
        "g-1",
        "u-1",
        "duty-officer",
        Utc.with_ymd_and_hms(2025, 10, 20, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2025, 10, 25, 0, 0, 0).unwrap(),
    );
    assert!(fixture.check(None).eligible());
}

#[test]
fn unavailability_window_fails() {
    let mut fixture = Fixture::new();
    fixture.windows.push(UnavailabilityWindow::new(
        "w-1",
        "u-1",
        date(20),
        date(25),
        Some("medical".into()),
    ));

    let verdict = fixture.check(None);
    assert_eq!(verdict.reasons, vec![IneligibleReason::Unavailable]);
}

#[test]
fn other_users_windows_are_ignored() {
    let mut fixture = Fixture::new();
    fixture
        .windows
        .push(UnavailabilityWindow::new("w-1", "u-9", date(20), date(25), None));

    assert!(fixture.check(None).eligible());
}

#[test]
fn existing_allocation_fails_double_booking() {
    let mut fixture = Fixture::new();
    fixture.existing = Some(Allocation::new("a-1", "u-1", "p-2", date(22), false, None));

    let verdict = fixture.check(None);
    assert_eq!(verdict.reasons, vec![IneligibleReason::AlreadyAssigned]);
}

#[test]
fn exempt_allocation_is_ignored_during_revalidation() {
    let mut fixture = Fixture::new();
    fixture.existing = Some(Allocation::new("a-1", "u-1", "p-2", date(22), false, None));

    let exempt = AllocationId::from("a-1");
    assert!(fixture.check(Some(&exempt)).eligible());

    // A different allocation id still fails
    let other = AllocationId::from("a-9");
    assert!(!fixture.check(Some(&other)).eligible());
}

#[test]
fn absent_user_fails() {
    let mut fixture = Fixture::new();
    fixture.presence = PresenceStatus::Out;

    let verdict = fixture.check(None);
    assert_eq!(verdict.reasons, vec![IneligibleReason::Absent]);
}

#[test]
fn all_failing_reasons_are_collected() {
    let mut fixture = Fixture::new();
    fixture.user.cohort = "3".to_string();
    fixture.post = fixture
        .post
        .with_gender(GenderRestriction::Female)
        .with_required_role("armorer");
    fixture.presence = PresenceStatus::Out;

    let verdict = fixture.check(None);
    assert_eq!(verdict.reasons.len(), 4);
    assert!(verdict.summary().contains("gender restriction"));
    assert!(verdict.summary().contains("cohort mismatch"));
    assert!(verdict.summary().contains("missing role armorer"));
    assert!(verdict.summary().contains("absent"));
}

#[test]
fn evaluation_is_deterministic() {
    let mut fixture = Fixture::new();
    fixture.user.cohort = "3".to_string();
    fixture.presence = PresenceStatus::Out;

    let first = fixture.check(None);
    let second = fixture.check(None);
    assert_eq!(first, second);
}
