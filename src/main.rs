// src/main.rs
use relex::expr::{ExprLexer, ScannerConfig};

fn main() {
    // A tiny sample covering names, numbers, strings, comments, and symbols.
    let src = r#"item of items; total + 1.5 * count /* note */ ?? 'n\'a'"#;
    let config = ScannerConfig::BlockParameter {
        block: "for".into(),
        index: 1,
    };

    let mut lexer = ExprLexer::with_config(src, &config);
    println!("TOKENS:");
    loop {
        match lexer.next_token() {
            Ok(Some(t)) => println!("{:?}  {:?}", t.kind, t.text(src)),
            Ok(None) => break,
            Err(e) => {
                eprintln!("scan error: {e}");
                std::process::exit(1);
            }
        }
    }
}
