use clap::Parser;
use serde_json::Value;
use xmlfold::Cli;

const CATALOG: &str = "./xmlfold_core/tests/fixtures/catalog.xml";

fn run(args: &[&str]) -> anyhow::Result<String> {
    let cli = Cli::try_parse_from(std::iter::once("xmlfold").chain(args.iter().copied()))?;
    let mut out = Vec::new();
    cli.run_with(&mut out)?;
    Ok(String::from_utf8(out)?)
}

#[test]
fn convert() -> anyhow::Result<()> {
    let output = run(&[CATALOG, "convert"])?;
    let value: Value = serde_json::from_str(&output)?;
    let books = value["catalog"]["value"]["book"]
        .as_array()
        .ok_or_else(|| anyhow::anyhow!("books should be a list"))?;
    assert_eq!(books.len(), 2);
    assert_eq!(books[0]["attributes"]["id"], "bk101");
    assert_eq!(value["catalog"]["value"]["magazine"]["type"], "element");
    Ok(())
}

#[test]
fn convert_pretty_last_write() -> anyhow::Result<()> {
    let output = run(&[CATALOG, "convert", "--pretty", "--mixed-content", "last-write"])?;
    assert!(output.lines().count() > 1);
    let value: Value = serde_json::from_str(&output)?;
    assert_eq!(value["catalog"]["tag"], "catalog");
    Ok(())
}

#[test]
fn scan() -> anyhow::Result<()> {
    let output = run(&[CATALOG, "scan"])?;
    assert!(output.lines().any(|line| line == "XmlDeclaration xml"));
    assert!(output.lines().any(|line| line == "      Text #text \"Ralls, Kim\""));
    assert!(output
        .lines()
        .any(|line| line == "  ProcessingInstruction render \"mode=\\\"compact\\\"\""));
    Ok(())
}

#[test]
fn property() -> anyhow::Result<()> {
    let output = run(&[CATALOG, "property", "name", "attributeCount", "xmlLang"])?;
    assert_eq!(output, "name = catalog\nattributeCount = 2\nxmlLang = en\n");
    Ok(())
}

#[test]
fn unknown_property() {
    assert!(run(&[CATALOG, "property", "innerXml"]).is_err());
}

#[test]
fn missing_document() {
    assert!(run(&["./tests/no_such_document.xml", "convert"]).is_err());
}
