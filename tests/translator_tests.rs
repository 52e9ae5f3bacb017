//! Translator tests against the bundled demo store.

use ferro_geneid::store::{Field, Table};
use ferro_geneid::{
    Builder, GeneIdError, MappingStore, Resolved, TranslateOptions, Translation, Translator,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rstest::{fixture, rstest};
use std::path::PathBuf;
use tempfile::TempDir;

fn resource(rel: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(rel)
}

#[fixture]
fn g() -> Translator {
    Translator::open(resource("resources/master.json")).unwrap()
}

fn one(s: &str) -> Translation {
    Translation::One(s.to_string())
}

fn many(v: &[&str]) -> Translation {
    Translation::Many(v.iter().map(|s| s.to_string()).collect())
}

fn single(t: Translation) -> Resolved {
    Resolved::Single(t)
}

#[rstest]
fn test_info_lists_databases(g: Translator) {
    let info = g.get_info();
    assert_eq!(
        info.dbs,
        vec!["symbol", "ensembl_gene", "entrez", "hgnc", "uniprot"]
    );
    assert!(info.log[0].starts_with("Built from"));
}

#[rstest]
fn test_symbol_to_ensembl_gene_batch(g: Translator) {
    let result = g.symbol_to_ensembl_gene(["FOXP2", "MYC", "CEBPA"]).unwrap();
    assert_eq!(
        result,
        Resolved::Batch(vec![
            one("ENSG00000128573"),
            one("ENSG00000136997"),
            one("ENSG00000245848"),
        ])
    );
}

#[rstest]
#[case::entrez("7157", "entrez")]
#[case::ensembl("ENSG00000141510", "ensembl_gene")]
#[case::hgnc("HGNC:11998", "hgnc")]
#[case::uniprot("P04637", "uniprot")]
fn test_id_to_symbol_per_database(g: Translator, #[case] id: &str, #[case] db: &str) {
    let result = g.id_to_symbol(id, db, &TranslateOptions::new()).unwrap();
    assert_eq!(result, single(one("TP53")));
}

#[rstest]
#[case::official("MYC")]
#[case::alias("c-Myc")]
#[case::alias_mixed_case("bHLHe39")]
#[case::alias_upper("MYCC")]
fn test_symbol_or_synonym_to_entrez(g: Translator, #[case] symbol: &str) {
    assert_eq!(g.symbol_to_entrez(symbol).unwrap(), single(one("4609")));
}

#[rstest]
fn test_synonyms_sorted(g: Translator) {
    assert_eq!(
        g.synonyms("MYC").unwrap(),
        single(many(&["MYCC", "bHLHe39", "c-Myc"]))
    );
    assert_eq!(g.synonyms("ACTB").unwrap(), single(many(&[])));
}

#[rstest]
fn test_all_synonyms(g: Translator) {
    let options = TranslateOptions::new().all_synonyms(true);
    let result = g.ensembl_gene_to_symbol("ENSG00000136997", &options).unwrap();
    assert_eq!(result, single(many(&["MYC", "MYCC", "bHLHe39", "c-Myc"])));

    let ens = g.symbol_to_ensembl_gene(["FOXP2", "MYC"]).unwrap();
    let result = g.ensembl_gene_to_symbol(&ens, &options).unwrap();
    assert_eq!(result.len(), 2);
    assert!(result.iter().all(|t| matches!(t, Translation::Many(v) if v.len() > 1)));
}

#[rstest]
fn test_preferred_ids(g: Translator) {
    let ens = g.symbol_to_ensembl_gene(["FOXP2", "MYC", "CEBPA", "TP53"]).unwrap();
    let options = TranslateOptions::new().preferred(["CAGH44", "MYCC", "C/EBP-alpha"]);
    let result = g.ensembl_gene_to_symbol(&ens, &options).unwrap();
    assert_eq!(
        result,
        Resolved::Batch(vec![
            one("CAGH44"),
            one("MYCC"),
            one("C/EBP-alpha"),
            one("TP53"),
        ])
    );
}

#[rstest]
fn test_missing_ids(mut g: Translator) {
    let fakes = ["FAKE1", "FAKE2"];
    assert_eq!(
        g.ensembl_gene_to_symbol(fakes, &TranslateOptions::new()).unwrap(),
        Resolved::Batch(vec![Translation::Missing(None), Translation::Missing(None)])
    );

    let per_call = TranslateOptions::new().null_id("NA");
    assert_eq!(
        g.ensembl_gene_to_symbol("FAKE1", &per_call).unwrap(),
        single(Translation::Missing(Some("NA".to_string())))
    );

    g.set_default_null_id("unknown");
    assert_eq!(
        g.symbol_to_hgnc("FAKE1").unwrap(),
        single(Translation::Missing(Some("unknown".to_string())))
    );
    assert_eq!(
        g.symbol_to_hgnc("FAKE1")
            .unwrap()
            .as_single()
            .map(ToString::to_string),
        Some("unknown".to_string())
    );
}

#[rstest]
fn test_symbol_to_uniprot_keeps_all(g: Translator) {
    assert_eq!(
        g.symbol_to_uniprot("CDKN2A").unwrap(),
        single(many(&["P42771", "Q8N726"]))
    );
    // MIR21 has no UniProt accession
    assert!(g.symbol_to_uniprot("MIR21").unwrap().iter().all(Translation::is_missing));
}

#[rstest]
fn test_shared_id_keeps_last_row(g: Translator) {
    let result = g.uniprot_to_symbol("P69905", &TranslateOptions::new()).unwrap();
    assert_eq!(result, single(one("HBA2")));
}

#[rstest]
fn test_cross_id(g: Translator) {
    let result = g
        .cross_id(
            ["ENSG00000141510", "FAKE", "ENSG00000136997"],
            "ensembl_gene",
            "entrez",
            &TranslateOptions::new(),
        )
        .unwrap();
    assert_eq!(
        result,
        Resolved::Batch(vec![
            many(&["7157"]),
            Translation::Missing(None),
            many(&["4609"]),
        ])
    );

    let first = TranslateOptions::new().select_one(true);
    let result = g.cross_id("P04637", "uniprot", "hgnc", &first).unwrap();
    assert_eq!(result, single(one("HGNC:11998")));
}

#[rstest]
fn test_official_symbol(g: Translator) {
    let result = g.official_symbol(["p16", "ERBB", "EGFR", "nope"]).unwrap();
    assert_eq!(
        result,
        Resolved::Batch(vec![
            one("CDKN2A"),
            one("EGFR"),
            one("EGFR"),
            Translation::Missing(None),
        ])
    );
}

#[rstest]
fn test_resolve_generic_table(g: Translator) {
    let table = Table::parse("entrez", "symbol_to_id").unwrap();
    assert_eq!(table, Table::external("entrez", Field::SymbolToId));
    let result = g
        .resolve("KRAS2", table, &TranslateOptions::new())
        .unwrap();
    assert_eq!(result, single(many(&["3845"])));
}

#[rstest]
fn test_unknown_database(g: Translator) {
    let err = g
        .symbol_to_id("MYC", "refseq", &TranslateOptions::new())
        .unwrap_err();
    assert!(matches!(err, GeneIdError::UnknownDatabase { ref name } if name == "refseq"));

    let err = g.cross_id("4609", "entrez", "refseq", &TranslateOptions::new());
    assert!(err.is_err());
}

#[rstest]
fn test_random_symbols(g: Translator) {
    assert!(g.random_symbols(0).is_empty());
    let symbols = g.random_symbols(25);
    assert_eq!(symbols.len(), 25);
    let official: Vec<&str> = g.store().official_symbols().collect();
    assert!(symbols.iter().all(|s| official.contains(&s.as_str())));

    let a = g.random_symbols_with_rng(10, &mut StdRng::seed_from_u64(7));
    let b = g.random_symbols_with_rng(10, &mut StdRng::seed_from_u64(7));
    assert_eq!(a, b);

    assert!(Translator::empty().random_symbols(3).is_empty());
}

#[rstest]
fn test_add_db_then_translate(mut g: Translator) {
    let mut builder = Builder::from_store(g.store().clone());
    let summary = builder.add_db(resource("demos/toy_db.tsv"), "toy").unwrap();
    assert_eq!(summary.rows, 3);
    assert_eq!(summary.ids, 4);
    g.set_store(builder.into_store());

    assert!(g.get_info().dbs.contains(&"toy".to_string()));
    assert!(g.get_info().log.last().unwrap().starts_with("Added toy"));

    let opts = TranslateOptions::new();
    assert_eq!(g.symbol_to_id("c-Myc", "toy", &opts).unwrap(), single(one("TOY1")));
    assert_eq!(
        g.symbol_to_id("MYC", "toy", &opts.clone().select_one(false)).unwrap(),
        single(many(&["TOY1", "TOY2"]))
    );
    assert_eq!(g.id_to_symbol("TOY3", "toy", &opts).unwrap(), single(one("FOXP2")));
    assert_eq!(
        g.cross_id("TOY4", "toy", "entrez", &opts).unwrap(),
        single(many(&["7157"]))
    );
}

#[rstest]
fn test_save_and_reload(g: Translator) {
    let dir = TempDir::new().unwrap();
    for name in ["copy.json", "copy.json.gz"] {
        let path = dir.path().join(name);
        g.store().save(&path).unwrap();
        let reloaded = MappingStore::load(&path).unwrap();
        assert_eq!(&reloaded, g.store());
    }
}

#[test]
fn test_from_source() {
    let empty = Translator::from_source(None::<PathBuf>, true).unwrap();
    assert!(empty.store().is_empty());

    let loaded = Translator::from_source(Some(resource("resources/master.json")), false).unwrap();
    assert!(!loaded.store().is_empty());

    let err = Translator::open(resource("resources/does_not_exist.json")).unwrap_err();
    assert!(matches!(err, GeneIdError::Io { .. }));
}

#[rstest]
fn test_bundled_store_is_embedded(g: Translator) {
    let bundled = MappingStore::bundled().unwrap();
    assert_eq!(&bundled, g.store());
    assert_eq!(
        Translator::from_source(None::<PathBuf>, false).unwrap().store(),
        g.store()
    );
}
