use bemdecl_core::algebra::{intersect, merge, subtract};
use bemdecl_core::codec::{parse_declaration, to_json, DeclFormat};
use bemdecl_core::declaration::{BlockDecl, DeclEntry, Declaration};
use bemdecl_core::entity::BemEntity;
use serde_json::json;

fn bemdecl(value: serde_json::Value) -> Declaration {
    parse_declaration(&value.to_string()).unwrap()
}

fn blocks(decl: &Declaration) -> serde_json::Value {
    serde_json::to_value(decl.to_blocks()).unwrap()
}

fn sample() -> Declaration {
    bemdecl(json!([
        { "name": "page", "elems": [{ "name": "head" }, { "name": "body" }] },
        { "name": "button", "mods": [{ "name": "size", "vals": [{ "name": "s" }, { "name": "m" }] }] },
        { "name": "link", "mods": [{ "name": "pseudo" }] }
    ]))
}

#[test]
fn merge_bare_and_modified_entries_coexist() {
    let result = merge(&[
        bemdecl(json!([{ "name": "block" }])),
        bemdecl(json!([{ "name": "block", "mods": [{ "name": "m", "vals": [{ "name": "v" }] }] }])),
    ]);
    assert_eq!(
        blocks(&result),
        json!([
            { "name": "block" },
            { "name": "block", "mods": [{ "name": "m", "vals": [{ "name": "v" }] }] }
        ])
    );
}

#[test]
fn merge_is_idempotent_and_has_identity() {
    let a = sample();
    assert_eq!(merge(&[a.clone()]), a);
    assert_eq!(merge(&[a.clone(), a.clone()]), a);
    assert_eq!(merge(&[a.clone(), Declaration::new()]), a);
    assert_eq!(merge(&[Declaration::new(), a.clone()]), a);
}

#[test]
fn merge_unions_techs() {
    let e = BemEntity::parse("b").unwrap();
    let result = merge(&[
        Declaration::from_entries([DeclEntry::new(e.clone()).with_tech("css")]),
        Declaration::from_entries([DeclEntry::new(e.clone()).with_tech("js")]),
    ]);
    let techs: Vec<&str> = result.get(&e).unwrap().techs.iter().map(String::as_str).collect();
    assert_eq!(techs, ["css", "js"]);
}

#[test]
fn merge_is_commutative_up_to_order() {
    let a = sample();
    let b = bemdecl(json!([{ "name": "footer" }, { "name": "page" }]));
    let ab: std::collections::HashSet<BemEntity> = merge(&[a.clone(), b.clone()]).entities().cloned().collect();
    let ba: std::collections::HashSet<BemEntity> = merge(&[b, a]).entities().cloned().collect();
    assert_eq!(ab, ba);
}

#[test]
fn intersect_blocks_with_mods() {
    let a = bemdecl(json!([
        { "name": "block" },
        { "name": "block", "mods": [{ "name": "mod-name", "vals": [{ "name": "mod-val" }] }] },
        { "name": "block2" }
    ]));
    let b = bemdecl(json!([
        { "name": "block" },
        { "name": "block", "mods": [{ "name": "mod-name", "vals": [{ "name": "mod-val" }] }] },
        { "name": "block3" }
    ]));
    assert_eq!(
        blocks(&intersect(&[a, b])),
        json!([
            { "name": "block" },
            { "name": "block", "mods": [{ "name": "mod-name", "vals": [{ "name": "mod-val" }] }] }
        ])
    );
}

#[test]
fn intersect_mods_without_vals_yields_bare_and_modified() {
    let a = bemdecl(json!([{ "name": "block-1", "mods": [{ "name": "mod" }] }]));
    let b = bemdecl(json!([
        { "name": "block-1", "mods": [{ "name": "mod" }] },
        { "name": "block-2" }
    ]));
    assert_eq!(
        blocks(&intersect(&[a, b])),
        json!([{ "name": "block-1" }, { "name": "block-1", "mods": [{ "name": "mod" }] }])
    );
}

#[test]
fn intersect_bare_against_modified_keeps_only_bare() {
    let a = bemdecl(json!([{ "name": "block" }]));
    let b = bemdecl(json!([{ "name": "block", "mods": [{ "name": "m", "vals": [{ "name": "v" }] }] }]));
    assert_eq!(blocks(&intersect(&[a, b])), json!([{ "name": "block" }]));
}

#[test]
fn intersect_block_survives_without_its_modifiers() {
    let a = bemdecl(json!([{ "name": "b", "mods": [{ "name": "m", "vals": [{ "name": "1" }] }] }]));
    let b = bemdecl(json!([{ "name": "b", "mods": [{ "name": "m", "vals": [{ "name": "2" }] }] }]));
    assert_eq!(blocks(&intersect(&[a, b])), json!([{ "name": "b" }]));
}

#[test]
fn intersect_laws() {
    let a = sample();
    let b = bemdecl(json!([
        { "name": "button", "mods": [{ "name": "size", "vals": [{ "name": "m" }] }] },
        { "name": "page", "elems": [{ "name": "body" }] },
        { "name": "other" }
    ]));
    assert_eq!(intersect(&[a.clone(), a.clone()]), a);

    let i = intersect(&[a.clone(), b.clone()]);
    assert!(!i.is_empty());
    for e in i.entities() {
        assert!(a.contains(e) && b.contains(e), "{e} not in both inputs");
    }
    // order follows the first argument
    let order: Vec<String> = i.entities().map(|e| e.to_string()).collect();
    assert_eq!(order, ["page", "page__body", "button", "button_size_m"]);
}

#[test]
fn intersect_three_inputs() {
    let a = bemdecl(json!([{ "name": "x" }, { "name": "y" }, { "name": "z" }]));
    let b = bemdecl(json!([{ "name": "z" }, { "name": "y" }]));
    let c = bemdecl(json!([{ "name": "y" }]));
    assert_eq!(blocks(&intersect(&[a, b, c])), json!([{ "name": "y" }]));
}

#[test]
fn intersect_techs() {
    let e = BemEntity::parse("b").unwrap();
    let a = Declaration::from_entries([DeclEntry::new(e.clone()).with_tech("css").with_tech("js")]);
    let b = Declaration::from_entries([DeclEntry::new(e.clone()).with_tech("js")]);
    let unrestricted = Declaration::from_entries([e.clone()]);
    assert_eq!(intersect(&[a.clone(), b]).get(&e).unwrap().techs.len(), 1);
    assert_eq!(intersect(&[unrestricted, a]).get(&e).unwrap().techs.len(), 2);
}

#[test]
fn subtract_blocks() {
    let from = bemdecl(json!([{ "name": "block-1" }, { "name": "block-2" }]));
    let what = bemdecl(json!([{ "name": "block-2" }]));
    assert_eq!(blocks(&subtract(&from, &what)), json!([{ "name": "block-1" }]));
}

#[test]
fn subtract_modifier_value_keeps_block() {
    let from = sample();
    let what = bemdecl(json!([]));
    assert_eq!(subtract(&from, &what), from);

    let what = Declaration::from_entries([BemEntity::parse("button_size_s").unwrap()]);
    let result = subtract(&from, &what);
    assert!(result.contains(&BemEntity::parse("button").unwrap()));
    assert!(result.contains(&BemEntity::parse("button_size_m").unwrap()));
    assert!(!result.contains(&BemEntity::parse("button_size_s").unwrap()));
}

#[test]
fn subtract_whole_block_record_removes_children() {
    let from = sample();
    let what = bemdecl(json!([{ "name": "page", "elems": [{ "name": "head" }, { "name": "body" }] }]));
    let result = subtract(&from, &what);
    assert!(result.entities().all(|e| e.block_name() != "page"));
    assert_eq!(result.len(), from.len() - 3);
}

#[test]
fn subtract_laws() {
    let a = sample();
    assert!(subtract(&a, &a).is_empty());
    assert_eq!(subtract(&a, &Declaration::new()), a);
    assert!(subtract(&Declaration::new(), &a).is_empty());
}

#[test]
fn algebra_results_encode_back() {
    let result = merge(&[sample(), bemdecl(json!([{ "name": "footer" }]))]);
    let text = to_json(&result, DeclFormat::Bemdecl, false).unwrap();
    assert_eq!(parse_declaration(&text).unwrap(), result);
    let first: Vec<BlockDecl> = result.to_blocks().into_iter().take(1).collect();
    assert_eq!(first, vec![BlockDecl::bare("page")]);
}
