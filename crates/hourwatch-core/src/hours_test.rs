use super::*;

fn mapping(entries: &[(&str, &str)]) -> RawHours {
    RawHours::Mapping(
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect(),
    )
}

fn weekly(model: HoursModel) -> WeeklySchedule {
    match model {
        HoursModel::Weekly(schedule) => schedule,
        other => panic!("expected a weekly schedule, got {other:?}"),
    }
}

#[test]
fn weekday_names_are_case_insensitive_and_trimmed() {
    assert_eq!(parse_weekday("Monday"), Some(Weekday::Mon));
    assert_eq!(parse_weekday("  sunday "), Some(Weekday::Sun));
    assert_eq!(parse_weekday("WEDNESDAY"), Some(Weekday::Wed));
    assert_eq!(parse_weekday("Mon"), None);
    assert_eq!(parse_weekday("Funday"), None);
}

#[test]
fn weekday_mapping_becomes_schedule() {
    let schedule = weekly(normalize(&mapping(&[
        ("Monday", "11:00AM - 11:59PM"),
        ("Tuesday", "11:00AM - 11:59PM"),
    ])));

    let monday = schedule.get(Weekday::Mon).expect("monday present");
    assert_eq!(monday.open().minutes(), 660);
    assert_eq!(monday.close().minutes(), 1439);
    assert!(schedule.get(Weekday::Tue).is_some());
    assert!(schedule.get(Weekday::Wed).is_none());
}

#[test]
fn unparseable_day_is_absent_without_failing_the_schedule() {
    let schedule = weekly(normalize(&mapping(&[
        ("Monday", "garbage"),
        ("Tuesday", "11:00AM - 11:59PM"),
        ("Wednesday", "11:00AM-11:59PM"),
    ])));

    assert!(schedule.get(Weekday::Mon).is_none());
    assert!(schedule.get(Weekday::Tue).is_some());
    assert!(schedule.get(Weekday::Wed).is_none());
    assert_eq!(schedule.iter().count(), 1);
}

#[test]
fn non_weekday_key_makes_mapping_unknown() {
    let model = normalize(&mapping(&[
        ("Monday", "11:00AM - 11:59PM"),
        ("Holidays", "closed"),
    ]));
    assert_eq!(model, HoursModel::Unknown);
}

#[test]
fn empty_mapping_is_unknown() {
    assert_eq!(normalize(&mapping(&[])), HoursModel::Unknown);
}

#[test]
fn blank_text_is_unknown() {
    assert_eq!(normalize(&RawHours::Text(String::new())), HoursModel::Unknown);
    assert_eq!(
        normalize(&RawHours::Text("   \n\t".to_string())),
        HoursModel::Unknown
    );
}

#[test]
fn absent_input_is_unknown() {
    assert_eq!(HoursModel::from_optional(None), HoursModel::Unknown);
}

#[test]
fn plain_text_becomes_trimmed_free_text() {
    assert_eq!(
        normalize(&RawHours::Text("  11 AM to 11 PM  ".to_string())),
        HoursModel::FreeText("11 AM to 11 PM".to_string())
    );
}

#[test]
fn json_encoded_mapping_text_matches_the_mapping() {
    let raw = mapping(&[
        ("Monday", "11:00AM - 11:59PM"),
        ("Friday", "6:00PM - 2:00AM"),
    ]);
    let stored = RawHours::Text(raw.display());

    assert_eq!(normalize(&stored), normalize(&raw));
}

#[test]
fn text_that_looks_like_json_but_is_not_a_string_map_is_free_text() {
    let model = normalize(&RawHours::Text(r#"{"Monday": 12}"#.to_string()));
    assert_eq!(model, HoursModel::FreeText(r#"{"Monday": 12}"#.to_string()));
}

#[test]
fn display_of_mapping_is_a_json_object() {
    let raw = mapping(&[("Monday", "11:00AM - 11:59PM")]);
    assert_eq!(raw.display(), r#"{"Monday":"11:00AM - 11:59PM"}"#);
}

#[test]
fn raw_hours_deserializes_untagged() {
    let text: RawHours = serde_json::from_str(r#""11 AM to 11 PM""#).expect("text");
    assert_eq!(text, RawHours::Text("11 AM to 11 PM".to_string()));

    let map: RawHours =
        serde_json::from_str(r#"{"Monday":"11:00AM - 11:59PM"}"#).expect("mapping");
    assert!(matches!(map, RawHours::Mapping(_)));
}

#[test]
fn weekly_schedule_serializes_every_day() {
    let schedule = weekly(normalize(&mapping(&[("Monday", "11:00AM - 11:59PM")])));
    let json = serde_json::to_value(&schedule).expect("serialize");
    assert_eq!(json["Monday"], "11:00 - 23:59");
    assert!(json["Tuesday"].is_null());
}
