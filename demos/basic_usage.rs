use keepfts::{htmlmeta, Analyzer, Document, FallbackPolicy, SearchEngine};

fn main() -> anyhow::Result<()> {
    println!("=== keepfts Basic Usage Example ===\n");

    let mut engine = SearchEngine::new();

    // Insert some documents
    println!("Indexing documents...");

    let rust_page = htmlmeta::parse_str(
        r#"<html><head>
            <title>Rust Programming Language</title>
            <meta name="description" content="A language empowering everyone to build reliable and efficient software.">
            <meta name="keywords" content="rust, systems programming, memory safety">
        </head></html>"#,
    )?;

    engine.put([
        Document::new("https://www.rust-lang.org", rust_page.text()),
        Document::new(
            "https://go.dev",
            "Go is an open source programming language that makes it easy to build simple, reliable, and efficient software.",
        ),
        Document::new(
            "https://www.python.org",
            "Python is a programming language that lets you work quickly and integrate systems more effectively.",
        ),
        Document::new("https://habr.com", "Программирование на языке Rust: надёжные системы"),
    ])?;

    println!("✓ Indexed {} documents\n", engine.document_count());

    // Example 1: every term must match
    println!("--- Example 1: Search for 'reliable software' ---");
    for id in engine.search("reliable software") {
        println!("  {id}");
    }

    // Example 2: stemming folds inflections
    println!("\n--- Example 2: Search for 'programs' ---");
    for id in engine.search("programs") {
        println!("  {id}");
    }

    // Example 3: Russian text goes through the Russian stemmer
    println!("\n--- Example 3: Search for 'система' ---");
    for id in engine.search("система") {
        println!("  {id}");
    }

    // Example 4: stopwords and punctuation alone match nothing
    println!("\n--- Example 4: Search for ',,, the' ---");
    println!("  {} results", engine.search(",,, the").len());

    // Example 5: keep tokens in scripts without a stemmer
    println!("\n--- Example 5: Retaining unstemmable tokens ---");
    let analyzer = Analyzer::builder().fallback(FallbackPolicy::Retain).build();
    let mut cjk = SearchEngine::with_analyzer(analyzer);
    cjk.put([Document::new("tokyo", "東京 タワー")])?;
    println!("  '東京' -> {:?}", cjk.search("東京"));

    // Example 6: Statistics
    println!("\n--- Example 6: Index Statistics ---");
    let stats = engine.stats();
    println!("Total documents: {}", stats.total_documents);
    println!("Total unique terms: {}", stats.total_terms);
    println!("Average docs per term: {:.2}", stats.avg_docs_per_term);

    println!("\n=== Example Complete ===");

    Ok(())
}
