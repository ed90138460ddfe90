use super::*;
use crate::engine::types::{ImageReference, Tier};

fn session(lines: &[&str]) -> MenuSession {
    let mut session = MenuSession::new(NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
    session.set_school("B10", "7010536", "서울미래초등학교");
    session.replace_items(lines);
    session
}

fn labels(stickers: &[Option<Sticker>]) -> Vec<Option<&str>> {
    stickers
        .iter()
        .map(|s| s.as_ref().map(|s| s.label.as_str()))
        .collect()
}

#[test]
fn title_and_korean_date() {
    let sheet = Worksheet::build(&session(&["현미밥"]));
    assert_eq!(sheet.title, "서울미래초등학교 오늘의 급식");
    assert_eq!(sheet.date_label, "2025년 3월 14일 (금요일)");
    assert_eq!(
        date_label(NaiveDate::from_ymd_opt(2024, 12, 1).unwrap()),
        "2024년 12월 1일 (일요일)"
    );
}

#[test]
fn tray_sorts_dishes_into_compartments() {
    let sheet = Worksheet::build(&session(&[
        "친환경현미밥(1.2)",
        "쇠고기미역국(5.6.16)",
        "돈육불고기(10.13)",
        "배추김치(9)",
        "우유(2)",
        "사과",
    ]));
    let tray = &sheet.tray;
    assert_eq!(tray.rice.as_ref().unwrap().label, "현미밥");
    assert_eq!(tray.soup.as_ref().unwrap().label, "쇠고기미역국");
    assert_eq!(labels(&tray.sides), [Some("돈육불고기"), Some("배추김치"), None]);
    let snacks: Vec<_> = tray.snacks.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(snacks, ["우유", "사과"]);
}

#[test]
fn second_rice_dish_is_a_side() {
    let sheet = Worksheet::build(&session(&["잡곡밥", "김치볶음밥", "된장찌개", "순두부찌개"]));
    assert_eq!(sheet.tray.rice.as_ref().unwrap().label, "잡곡밥");
    assert_eq!(sheet.tray.soup.as_ref().unwrap().label, "된장찌개");
    // 순두부찌개 is a soup but the slot is taken
    assert_eq!(
        labels(&sheet.tray.sides),
        [Some("김치볶음밥"), Some("순두부찌개"), None]
    );
}

#[test]
fn extra_sides_leave_the_tray_but_keep_their_sticker() {
    let sheet = Worksheet::build(&session(&["잡채", "계란말이", "멸치볶음", "깍두기"]));
    assert_eq!(
        labels(&sheet.tray.sides),
        [Some("잡채"), Some("계란말이"), Some("멸치볶음")]
    );
    assert_eq!(sheet.stickers.len(), 4);
    assert!(sheet.tray.rice.is_none());
    assert!(sheet.tray.soup.is_none());
}

#[test]
fn pear_only_matches_at_the_end() {
    let sheet = Worksheet::build(&session(&["배", "배추김치"]));
    assert_eq!(sheet.tray.snacks.len(), 1);
    assert_eq!(sheet.tray.snacks[0].label, "배");
    assert_eq!(labels(&sheet.tray.sides), [Some("배추김치"), None, None]);
}

#[test]
fn hidden_items_are_left_out() {
    let mut s = session(&["현미밥", "배추김치"]);
    let kimchi = s.items()[1].id;
    s.toggle_hidden(kimchi).unwrap();

    let sheet = Worksheet::build(&s);
    assert_eq!(sheet.stickers.len(), 1);
    assert_eq!(labels(&sheet.tray.sides), [None, None, None]);
}

#[test]
fn stickers_carry_label_image_and_tracing_text() {
    let mut s = session(&["돈육불고기(10.13)"]);
    let id = s.items()[0].id;
    s.rename(id, "불고기").unwrap();
    s.set_image(id, ImageReference::new("https://img/bulgogi.png", Tier::WebSearch))
        .unwrap();

    let sheet = Worksheet::build(&s);
    assert_eq!(
        sheet.stickers[0],
        Sticker {
            id,
            label: "불고기".into(),
            image: Some("https://img/bulgogi.png".into()),
            tracing_text: Some("불고기".into()),
        }
    );

    s.toggle_tracing_text();
    let sheet = Worksheet::build(&s);
    assert_eq!(sheet.stickers[0].tracing_text, None);
}

#[test]
fn empty_menu_is_an_empty_sheet() {
    let sheet = Worksheet::build(&session(&[]));
    assert!(sheet.is_empty());
    assert_eq!(sheet.tray.sides.len(), SIDE_SLOTS);
}
