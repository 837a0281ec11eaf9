use super::*;
use chrono::TimeZone;

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, day, hour, 0, 0).unwrap()
}

#[test]
fn permanent_grant_is_always_active() {
    let grant = RoleGrant::permanent("g-1", "u-1", "armorer");
    assert!(grant.active_at(at(1, 0)));
    assert!(grant.active_at(at(31, 23)));
}

#[test]
fn temporary_grant_active_only_inside_window() {
    let grant = RoleGrant::temporary("g-1", "u-1", "duty-officer", at(10, 0), at(12, 0));

    assert!(!grant.active_at(at(9, 23)));
    assert!(grant.active_at(at(10, 0)));
    assert!(grant.active_at(at(11, 12)));
    assert!(grant.active_at(at(12, 0)));
    assert!(!grant.active_at(at(12, 1)));
}

#[test]
fn role_names_match_case_insensitively() {
    let grant = RoleGrant::permanent("g-1", "u-1", "Armorer");
    assert!(grant.grants("armorer"));
    assert!(grant.grants("ARMORER"));
    assert!(!grant.grants("driver"));
}

#[test]
fn effective_roles_unions_permanent_and_active_temporary() {
    let grants = vec![
        RoleGrant::permanent("g-1", "u-1", "Armorer"),
        RoleGrant::temporary("g-2", "u-1", "duty-officer", at(10, 0), at(12, 0)),
        RoleGrant::temporary("g-3", "u-1", "driver", at(20, 0), at(22, 0)),
        RoleGrant::permanent("g-4", "u-2", "medic"),
    ];

    let roles = effective_roles(&grants, &UserId::from("u-1"), at(11, 0));
    assert_eq!(
        roles.into_iter().collect::<Vec<_>>(),
        vec!["armorer", "duty-officer"]
    );
}

#[test]
fn has_role_respects_user_window_and_case() {
    let grants = vec![RoleGrant::temporary(
        "g-1",
        "u-1",
        "Duty-Officer",
        at(10, 0),
        at(12, 0),
    )];
    let user = UserId::from("u-1");

    assert!(has_role(&grants, &user, "duty-officer", at(11, 0)));
    assert!(!has_role(&grants, &user, "duty-officer", at(15, 0)));
    assert!(!has_role(&grants, &UserId::from("u-2"), "duty-officer", at(11, 0)));
}
