use pharmafind_pubmed::fetch::split_articles;
use pharmafind_pubmed::record::parse_record;

fn load_document(filename: &str) -> String {
    let dir = std::env::var("BENCH_DATA_DIR")
        .expect("set BENCH_DATA_DIR to directory with sample data files");
    let path = std::path::Path::new(&dir).join(filename);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("{}: {e}", path.display()))
}

#[divan::bench]
fn split_efetch_bench(bencher: divan::Bencher) {
    // One EFetch response (PubmedArticleSet), e.g. 100 records
    let doc = load_document("efetch_sample.xml");
    bencher.bench(|| split_articles(&doc).unwrap());
}

#[divan::bench]
fn parse_records_bench(bencher: divan::Bencher) {
    let doc = load_document("efetch_sample.xml");
    let articles = split_articles(&doc).unwrap();
    bencher.bench(|| articles.iter().filter_map(parse_record).count());
}

fn main() {
    divan::main();
}
