//! Unit + property tests for dish name refinement.

use super::*;
use proptest::prelude::*;

#[test]
fn strips_footnote_numbers() {
    assert_eq!(refine("현미밥(1.2)"), "현미밥");
    assert_eq!(refine("쇠고기미역국(5.6.16)"), "쇠고기미역국");
}

#[test]
fn strips_self_serve_marker() {
    assert_eq!(refine("깍두기(자율)"), "깍두기");
    assert_eq!(refine("배추김치 자율"), "배추김치");
}

#[test]
fn strips_modifiers_before_footnotes_are_seen() {
    assert_eq!(refine("친환경현미밥(1.2)"), "현미밥");
    assert_eq!(refine("유기농우리밀빵"), "빵");
    assert_eq!(refine("오븐에구운닭다리(15)"), "닭다리");
}

#[test]
fn modifiers_are_case_insensitive() {
    assert_eq!(refine("gap사과"), "사과");
    assert_eq!(refine("GAP 방울토마토"), "방울토마토");
}

#[test]
fn parenthesized_modifiers_go_with_their_brackets() {
    assert_eq!(refine("(산간)잡곡밥"), "잡곡밥");
    assert_eq!(refine("두부조림(채식)"), "두부조림");
}

#[test]
fn strips_circled_digits() {
    assert_eq!(refine("돈육불고기①②⑬"), "돈육불고기");
}

#[test]
fn punctuation_becomes_spacing() {
    assert_eq!(refine("*잡채/볶음"), "잡채 볶음");
    assert_eq!(refine("[요리]  <김밥>"), "요리 김밥");
}

#[test]
fn blank_input_stays_blank() {
    assert_eq!(refine(""), "");
    assert_eq!(refine("   \t "), "");
}

#[test]
fn fully_stripped_input_falls_back_to_normalized_raw() {
    assert_eq!(refine("  친환경  "), "친환경");
    assert_eq!(refine("(1.2)"), "(1.2)");
    assert_eq!(refine(refine("(1.2)").as_str()), "(1.2)");
}

#[test]
fn deletion_that_forms_a_new_modifier_is_still_stripped() {
    // removing "구운" joins "오" and "븐" into another modifier
    assert_eq!(refine("오구운븐감자"), "감자");
}

#[test]
fn refine_is_idempotent_on_samples() {
    let samples = [
        "친환경현미밥(1.2)",
        "쇠고기미역국(5.6.16)",
        "깍두기(자율)",
        "*수제돈까스/소스(1.2.5.6)",
        "우유②",
        "특식(산간) 비빔밥",
        "(1.2)",
    ];
    for raw in samples {
        let once = refine(raw);
        assert_eq!(refine(&once), once, "not idempotent for {raw:?}");
    }
}

#[test]
fn keywords_prefer_specific_entries() {
    assert_eq!(search_keywords("현미밥"), "brown rice");
    assert_eq!(search_keywords("흑미밥"), "rice");
    assert_eq!(search_keywords("쇠고기미역국"), "seaweed soup");
    assert_eq!(search_keywords("배추김치"), "kimchi");
    assert_eq!(search_keywords("깍두기"), "radish kimchi");
}

#[test]
fn keywords_fall_back_to_the_name() {
    assert_eq!(search_keywords("탕평채"), "탕평채");
}

proptest! {
    #[test]
    fn refine_is_idempotent(raw in "[가-힣a-zA-Z0-9 ().*/<>\\[\\]①-⑲]{0,24}") {
        let once = refine(&raw);
        prop_assert_eq!(refine(&once), once);
    }

    #[test]
    fn refine_never_empties_meaningful_input(raw in "[가-힣]{1,8}(\\([0-9.]{1,5}\\))?") {
        prop_assert!(!refine(&raw).is_empty());
    }
}
