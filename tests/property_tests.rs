//! Property-based tests for translator result shapes and self-mapping laws.

use ferro_geneid::{Ids, Resolved, TranslateOptions, Translation, Translator};
use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;
use std::sync::OnceLock;

fn translator() -> &'static Translator {
    static TRANSLATOR: OnceLock<Translator> = OnceLock::new();
    TRANSLATOR.get_or_init(|| {
        Translator::open(concat!(env!("CARGO_MANIFEST_DIR"), "/resources/master.json")).unwrap()
    })
}

fn official_symbols() -> Vec<String> {
    translator()
        .store()
        .official_symbols()
        .map(str::to_string)
        .collect()
}

/// Any known official symbol.
fn official_symbol() -> impl Strategy<Value = String> {
    prop::sample::select(official_symbols())
}

/// Identifiers that can never be in the store.
fn unknown_id() -> impl Strategy<Value = String> {
    "[a-z0-9]{1,12}".prop_map(|s| format!("ZZUNKNOWN_{}", s))
}

/// `(official, synonym)` pairs where the synonym resolves to nothing else.
fn owned_synonym() -> impl Strategy<Value = (String, String)> {
    let symbol = translator().store().symbol();
    let pairs: Vec<(String, String)> = symbol
        .synonyms
        .iter()
        .flat_map(|(official, synonyms)| synonyms.iter().map(move |s| (official, s)))
        .filter(|(official, s)| symbol.official.get(*s) == Some(*official))
        .map(|(official, s)| (official.clone(), s.clone()))
        .collect();
    prop::sample::select(pairs)
}

type Lookup = fn(&Translator, Ids) -> Resolved;

fn lookups() -> [Lookup; 4] {
    [
        |g: &Translator, ids: Ids| g.official_symbol(ids).unwrap(),
        |g: &Translator, ids: Ids| g.synonyms(ids).unwrap(),
        |g: &Translator, ids: Ids| g.symbol_to_entrez(ids).unwrap(),
        |g: &Translator, ids: Ids| g.cross_id(ids, "entrez", "uniprot", &TranslateOptions::new()).unwrap(),
    ]
}

/// A known symbol or an unknown identifier.
fn any_id() -> impl Strategy<Value = String> {
    prop_oneof![official_symbol(), unknown_id()]
}

/// A mix of known symbols and unknown identifiers.
fn mixed_ids() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(any_id(), 0..20)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// One result per input, single input gives a single result
    #[test]
    fn test_batch_shape(ids in mixed_ids()) {
        let g = translator();
        for result in [
            g.official_symbol(ids.clone()).unwrap(),
            g.synonyms(ids.clone()).unwrap(),
            g.symbol_to_entrez(ids.clone()).unwrap(),
            g.cross_id(ids.clone(), "entrez", "uniprot", &TranslateOptions::new()).unwrap(),
        ] {
            prop_assert_eq!(result.len(), ids.len());
            prop_assert_eq!(matches!(result, Resolved::Single(_)), ids.len() == 1);
        }
    }

    /// A bare identifier and a one-element list give the same result
    #[test]
    fn test_single_equals_singleton_list(id in any_id()) {
        let g = translator();
        for f in lookups() {
            prop_assert_eq!(f(g, Ids::from(id.as_str())), f(g, Ids::from(vec![id.clone()])));
        }
    }

    /// A pair lookup is the two single lookups side by side
    #[test]
    fn test_pair_splits_into_singles(x in any_id(), y in any_id()) {
        let g = translator();
        for f in lookups() {
            let pair = f(g, Ids::from(vec![x.clone(), y.clone()])).into_vec();
            let mut singles = f(g, Ids::from(x.as_str())).into_vec();
            singles.extend(f(g, Ids::from(y.as_str())).into_vec());
            prop_assert_eq!(pair, singles);
        }
    }

    /// Every synonym owned by one gene resolves to that gene's official symbol
    #[test]
    fn test_synonym_resolves_to_owner((official, synonym) in owned_synonym()) {
        let g = translator();
        let result = g.official_symbol(synonym.as_str()).unwrap();
        prop_assert_eq!(result, Resolved::Single(Translation::One(official)));
    }

    /// Unknown identifiers yield the missing-value default, never an error
    #[test]
    fn test_unknown_ids_are_missing(ids in prop::collection::vec(unknown_id(), 1..10), null in "[A-Z]{1,3}") {
        let g = translator();
        let plain = g.ensembl_gene_to_symbol(ids.clone(), &TranslateOptions::new()).unwrap();
        prop_assert!(plain.iter().all(|t| *t == Translation::Missing(None)));

        let options = TranslateOptions::new().null_id(null.clone());
        let with_null = g.symbol_to_id(ids, "hgnc", &options).unwrap();
        prop_assert!(with_null.iter().all(|t| *t == Translation::Missing(Some(null.clone()))));
    }

    /// Official symbols map to themselves
    #[test]
    fn test_official_symbol_is_fixed_point(symbol in official_symbol()) {
        let g = translator();
        let result = g.official_symbol(symbol.as_str()).unwrap();
        prop_assert_eq!(result, Resolved::Single(Translation::One(symbol)));
    }

    /// symbol -> ID -> symbol returns the official symbol
    #[test]
    fn test_entrez_round_trip(symbol in official_symbol()) {
        let g = translator();
        let entrez = g.symbol_to_entrez(symbol.as_str()).unwrap();
        if let Some(Translation::One(id)) = entrez.as_single() {
            let back = g.entrez_to_symbol(id.as_str(), &TranslateOptions::new()).unwrap();
            prop_assert_eq!(back, Resolved::Single(Translation::One(symbol)));
        }
    }

    /// Preferred IDs always come from the gene's own symbol list
    #[test]
    fn test_preferred_stays_within_gene(symbol in official_symbol(), pick in any::<prop::sample::Index>()) {
        let g = translator();
        let synonyms = g.synonyms(symbol.as_str()).unwrap();
        let Some(Translation::Many(list)) = synonyms.as_single() else {
            return Ok(());
        };
        let Some(Translation::One(ens)) = g.symbol_to_ensembl_gene(symbol.as_str()).unwrap().as_single().cloned() else {
            return Ok(());
        };

        let expected = if list.is_empty() { symbol.clone() } else { list[pick.index(list.len())].clone() };
        let options = TranslateOptions::new().preferred([expected.clone()]);
        let result = g.ensembl_gene_to_symbol(ens.as_str(), &options).unwrap();
        prop_assert_eq!(result, Resolved::Single(Translation::One(expected)));
    }
}
