use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Asia::Shanghai;
use cnholiday::{aggregate_totals, build_holiday_periods, ical::parse_calendar, Error, Timestamp};

fn vevent(uid: &str, summary: &str, start: &str, end: &str) -> String {
    format!(
        "BEGIN:VEVENT\nUID:{uid}\nDTSTART;VALUE=DATE:{start}\nDTEND;VALUE=DATE:{end}\nSUMMARY:{summary}\nEND:VEVENT\n"
    )
}

fn feed() -> String {
    let mut text = String::from("BEGIN:VCALENDAR\nVERSION:2.0\nPRODID:-//cnholiday//test//CN\n");
    for day in 1..=5 {
        text += &vevent(
            &format!("labor-{day}"),
            &format!("劳动节 第{day}天/共5天"),
            &format!("2025050{day}"),
            &format!("2025050{}", day + 1),
        );
    }
    text += &vevent("labor-makeup", "劳动节 补班", "20250427", "20250428");
    text += &vevent("old", "春节", "20230121", "20230128");
    text += "BEGIN:VEVENT\nUID:no-start\nSUMMARY:占位\nEND:VEVENT\n";
    text += "BEGIN:VEVENT\nUID:tz\nDTSTART;TZID=Asia/Shanghai:20251001T000000\nDTEND;TZID=Asia/Shanghai:20251008T235959\nSUMMARY:国庆节 假期\nEND:VEVENT\n";
    text += "END:VCALENDAR\n";
    text
}

fn now() -> Timestamp {
    NaiveDate::from_ymd_opt(2025, 4, 1).unwrap().and_time(NaiveTime::MIN).into()
}

#[test]
fn parses_feed_events() {
    let events = parse_calendar(&feed()).unwrap();

    // the event without DTSTART is dropped by the parser
    assert_eq!(events.len(), 8);
    assert!(events.iter().take(7).all(|e| e.all_day));
    assert_eq!(events[0].uid, "labor-1");
    assert_eq!(events[0].title, "劳动节 第1天/共5天");
    assert!(!events[7].all_day);
}

#[test]
fn feed_to_periods() {
    let events = parse_calendar(&feed()).unwrap();
    let periods = build_holiday_periods(&events, &now(), &Shanghai);

    let names: Vec<_> = periods.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["劳动节", "国庆节"]);

    let labor = &periods[0];
    assert_eq!(labor.begin.date_naive(), NaiveDate::from_ymd_opt(2025, 5, 1).unwrap());
    assert_eq!(labor.end.date_naive(), NaiveDate::from_ymd_opt(2025, 5, 5).unwrap());
    assert_eq!(
        (labor.total_days, labor.days_excl_makeup, labor.days_excl_makeup_weekend),
        (5, 4, 2)
    );
    assert_eq!(labor.uid, "labor-1");

    let national = &periods[1];
    assert_eq!(national.total_days, 8);
    assert_eq!(national.days_excl_makeup_weekend, 6);

    let totals = aggregate_totals(&periods);
    assert_eq!((totals.total, totals.excl_makeup, totals.excl_makeup_weekend), (13, 12, 8));
}

#[test]
fn rejects_text_that_is_not_a_calendar() {
    assert!(matches!(parse_calendar("<html>503</html>"), Err(Error::Parse(_))));
}
