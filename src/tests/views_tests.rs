/// Tests for the canonical-order view helpers: the tables and grids never
/// change shape, whatever subset or ordering the server returned.
use crate::types::{BuildingAggregate, PriceQuote, BUILDING_CATALOG, RESOURCE_CATALOG};
use crate::ui::views::{
    building_glyph, canonical_buildings, canonical_quotes, capitalize, resource_glyph,
};

fn quote(resource: &str, price: f64) -> PriceQuote {
    PriceQuote {
        resource: resource.to_string(),
        current_price: price,
        change_from_prev_percent: 0.0,
        change_from_start_percent: 0.0,
    }
}

// ── canonical_quotes ──────────────────────────────────────────────────────────

#[test]
fn quotes_are_reordered_into_catalog_order() {
    let out = canonical_quotes(&[quote("рыба", 7.0), quote("дерево", 3.0)]);
    assert_eq!(out.len(), RESOURCE_CATALOG.len());
    for (quote, &name) in out.iter().zip(RESOURCE_CATALOG.iter()) {
        assert_eq!(quote.resource, name);
    }
    assert_eq!(out[0].current_price, 3.0); // дерево
    assert_eq!(out[7].current_price, 7.0); // рыба
}

#[test]
fn missing_quotes_are_synthesized_with_zeros() {
    let out = canonical_quotes(&[]);
    assert_eq!(out.len(), RESOURCE_CATALOG.len());
    assert!(out.iter().all(|q| q.current_price == 0.0));
}

#[test]
fn unknown_resources_are_ignored() {
    let out = canonical_quotes(&[quote("пряности", 99.0)]);
    assert_eq!(out.len(), RESOURCE_CATALOG.len());
    assert!(out.iter().all(|q| q.resource != "пряности"));
}

// ── canonical_buildings ───────────────────────────────────────────────────────

#[test]
fn building_grid_always_has_a_full_card_set() {
    let reported = vec![BuildingAggregate {
        name: "Золотой рудник".to_string(),
        count: 1,
        players_percentage: 10.0,
    }];
    let out = canonical_buildings(&reported);
    assert_eq!(out.len(), BUILDING_CATALOG.len());
    for (card, &name) in out.iter().zip(BUILDING_CATALOG.iter()) {
        assert_eq!(card.name, name);
    }
    // The one reported card keeps its data, the rest read zero.
    assert_eq!(out.last().map(|c| c.count), Some(1));
    assert_eq!(out[0].count, 0);
}

// ── glyphs and text ───────────────────────────────────────────────────────────

#[test]
fn every_catalog_entry_has_a_glyph() {
    for &name in &RESOURCE_CATALOG {
        assert_ne!(resource_glyph(name), "▫", "no glyph for {name}");
    }
    for &name in &BUILDING_CATALOG {
        assert_ne!(building_glyph(name), "▦", "no glyph for {name}");
    }
}

#[test]
fn unknown_names_get_the_fallback_glyph() {
    assert_eq!(resource_glyph("пряности"), "▫");
    assert_eq!(building_glyph("Цирк"), "▦");
}

#[test]
fn capitalize_uppercases_the_first_cyrillic_letter() {
    assert_eq!(capitalize("зерно"), "Зерно");
    assert_eq!(capitalize("Ферма"), "Ферма");
    assert_eq!(capitalize(""), "");
}
