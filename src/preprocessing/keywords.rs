//! Korean dish name → English search keywords for providers that index
//! English tags (Pixabay). First matching substring wins, so specific dishes
//! are listed ahead of the generic words they contain.

const KEYWORDS: &[(&str, &str)] = &[
    ("현미밥", "brown rice"),
    ("볶음밥", "fried rice"),
    ("비빔밥", "bibimbap"),
    ("잡곡밥", "multigrain rice"),
    ("카레", "curry rice"),
    ("미역국", "seaweed soup"),
    ("된장국", "soybean paste soup"),
    ("된장찌개", "soybean paste stew"),
    ("김치찌개", "kimchi stew"),
    ("만둣국", "dumpling soup"),
    ("어묵", "fish cake"),
    ("깍두기", "radish kimchi"),
    ("김치", "kimchi"),
    ("불고기", "bulgogi"),
    ("돈까스", "pork cutlet"),
    ("돈가스", "pork cutlet"),
    ("떡볶이", "tteokbokki"),
    ("잡채", "japchae noodles"),
    ("계란", "egg"),
    ("달걀", "egg"),
    ("두부", "tofu"),
    ("감자", "potato"),
    ("나물", "seasoned vegetables"),
    ("샐러드", "salad"),
    ("생선", "grilled fish"),
    ("고등어", "mackerel"),
    ("치킨", "fried chicken"),
    ("닭", "chicken"),
    ("만두", "dumplings"),
    ("우유", "milk"),
    ("요구르트", "yogurt"),
    ("방울토마토", "cherry tomato"),
    ("사과", "apple"),
    ("바나나", "banana"),
    ("귤", "tangerine"),
    ("수박", "watermelon"),
    ("딸기", "strawberry"),
    ("포도", "grapes"),
    ("국", "soup"),
    ("밥", "rice"),
];

/// English keywords for a refined dish name, or the name itself when no
/// entry matches.
pub fn search_keywords(refined: &str) -> String {
    KEYWORDS
        .iter()
        .find(|(korean, _)| refined.contains(korean))
        .map(|(_, english)| english.to_string())
        .unwrap_or_else(|| refined.to_string())
}
