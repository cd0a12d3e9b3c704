use std::path::PathBuf;
use std::str::FromStr;
use xmlfold_core::*;

fn catalog() -> anyhow::Result<TreeBuilder> {
    Ok(TreeBuilder::open(PathBuf::from_str(
        "./tests/fixtures/catalog.xml",
    )?)?)
}

/// Reads until the cursor is on a start tag with the given name.
fn seek(builder: &mut TreeBuilder, name: &str) -> anyhow::Result<()> {
    while builder.invoke("read", &[])? == PropertyValue::Bool(true) {
        if builder.property(Property::NodeType) == PropertyValue::NodeType(NodeType::Element)
            && builder.tokenizer().name() == name
        {
            return Ok(());
        }
    }
    anyhow::bail!("no element '{name}'")
}

#[test]
fn properties_by_name() -> anyhow::Result<()> {
    let mut builder = catalog()?;
    seek(&mut builder, "catalog")?;
    assert_eq!(
        builder.property_by_name("nodeType")?,
        PropertyValue::NodeType(NodeType::Element)
    );
    assert_eq!(builder.property_by_name("depth")?, PropertyValue::Int(0));
    assert_eq!(builder.property_by_name("attributeCount")?, PropertyValue::Int(2));
    assert_eq!(builder.property_by_name("hasAttributes")?, PropertyValue::Bool(true));
    assert_eq!(builder.property_by_name("isDefault")?, PropertyValue::Bool(false));
    assert_eq!(
        builder.property_by_name("xmlLang")?,
        PropertyValue::Text(Some("en".to_owned()))
    );
    assert_eq!(
        builder.property_by_name("baseURI")?,
        PropertyValue::Text(Some("./tests/fixtures/catalog.xml".to_owned()))
    );
    Ok(())
}

#[test]
fn namespaced_element() -> anyhow::Result<()> {
    let mut builder = catalog()?;
    seek(&mut builder, "dc:title")?;
    assert_eq!(builder.property_by_name("depth")?, PropertyValue::Int(2));
    assert_eq!(
        builder.property_by_name("localName")?,
        PropertyValue::Text(Some("title".to_owned()))
    );
    assert_eq!(
        builder.property_by_name("prefix")?,
        PropertyValue::Text(Some("dc".to_owned()))
    );
    assert_eq!(
        builder.property_by_name("namespaceURI")?,
        PropertyValue::Text(Some("http://purl.org/dc/elements/1.1/".to_owned()))
    );
    assert_eq!(builder.invoke("read", &[])?, PropertyValue::Bool(true));
    assert_eq!(builder.property_by_name("hasValue")?, PropertyValue::Bool(true));
    assert_eq!(
        builder.property_by_name("value")?,
        PropertyValue::Text(Some("XML Developer's Guide".to_owned()))
    );
    Ok(())
}

#[test]
fn delegated_operations() -> anyhow::Result<()> {
    let mut builder = catalog()?;
    seek(&mut builder, "book")?;
    assert_eq!(
        builder.invoke("getAttribute", &["id"])?,
        PropertyValue::Text(Some("bk101".to_owned()))
    );
    assert_eq!(builder.invoke("moveToAttribute", &["format"])?, PropertyValue::Bool(true));
    assert_eq!(
        builder.property(Property::NodeType),
        PropertyValue::NodeType(NodeType::Attribute)
    );
    assert_eq!(
        builder.property(Property::Value),
        PropertyValue::Text(Some("hardcover".to_owned()))
    );
    assert_eq!(builder.invoke("moveToElement", &[])?, PropertyValue::Bool(true));

    // Skip the first book entirely: the next element start is the second book.
    assert_eq!(builder.invoke("next", &[])?, PropertyValue::Bool(true));
    seek(&mut builder, "book")?;
    assert_eq!(builder.tokenizer().get_attribute("id"), Some("bk102"));
    Ok(())
}

#[test]
fn unknown_names() -> anyhow::Result<()> {
    let mut builder = catalog()?;
    assert!(matches!(
        builder.property_by_name("innerXML"),
        Err(Error::UnknownProperty(name)) if name == "innerXML"
    ));
    assert!(matches!(
        builder.invoke("expand", &[]),
        Err(Error::UnsupportedOperation(name)) if name == "expand"
    ));
    Ok(())
}

#[test]
fn close_then_reset() -> anyhow::Result<()> {
    let mut builder = catalog()?;
    builder.invoke("close", &[])?;
    assert!(!builder.tokenizer().is_open());
    assert_eq!(builder.invoke("read", &[])?, PropertyValue::Bool(false));
    builder.reset()?;
    assert_eq!(builder.invoke("read", &[])?, PropertyValue::Bool(true));
    assert_eq!(
        builder.property(Property::NodeType),
        PropertyValue::NodeType(NodeType::XmlDeclaration)
    );
    Ok(())
}
