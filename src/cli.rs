use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use serde_json::Value;
use std::io::Write;
use std::path::PathBuf;
use xmlfold_core::{
    BuildOptions, DEFAULT_MAX_DEPTH, MixedContent, NodeType, Property, PropertyValue, Tokenizer,
    TreeBuilder,
};

/// Folds XML documents into JSON trees
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path of the XML document
    #[arg(value_hint = clap::ValueHint::FilePath)]
    document: PathBuf,
    /// Action to perform on the document
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fold the document into a tree and print it as JSON
    Convert {
        /// Indent the output
        #[arg(long)]
        pretty: bool,
        /// How to fold text mixed with child elements
        #[arg(long, value_enum, default_value_t = MixedContentArg::PreferElements)]
        mixed_content: MixedContentArg,
        /// Maximum element nesting
        #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
        max_depth: usize,
    },
    /// Print every node of the document
    Scan,
    /// Print properties of the document element
    Property {
        /// Property names, e.g. `localName` or `attributeCount`
        #[arg(required = true)]
        names: Vec<String>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum MixedContentArg {
    PreferElements,
    LastWrite,
}

impl From<MixedContentArg> for MixedContent {
    fn from(value: MixedContentArg) -> Self {
        match value {
            MixedContentArg::PreferElements => MixedContent::PreferElements,
            MixedContentArg::LastWrite => MixedContent::LastWrite,
        }
    }
}

impl Cli {
    /// Runs the command, writing to standard output.
    pub fn run(&self) -> anyhow::Result<()> {
        let stdout = std::io::stdout();
        self.run_with(&mut stdout.lock())
    }

    /// Runs the command, writing to `out`.
    pub fn run_with<W: Write>(&self, out: &mut W) -> anyhow::Result<()> {
        match &self.command {
            Commands::Convert {
                pretty,
                mixed_content,
                max_depth,
            } => {
                let options = BuildOptions {
                    mixed_content: (*mixed_content).into(),
                    max_depth: *max_depth,
                };
                self.convert(options, *pretty, out)
            }
            Commands::Scan => self.scan(out),
            Commands::Property { names } => self.properties(names, out),
        }
    }

    fn convert<W: Write>(&self, options: BuildOptions, pretty: bool, out: &mut W) -> anyhow::Result<()> {
        info!("converting '{}' with {options:?}", self.document.display());
        let tree = TreeBuilder::build(self.document.as_path(), &options)
            .with_context(|| format!("failed to fold '{}'", self.document.display()))?;
        let object = Value::from(&tree);
        if pretty {
            serde_json::to_writer_pretty(&mut *out, &object)?;
        } else {
            serde_json::to_writer(&mut *out, &object)?;
        }
        writeln!(out)?;
        Ok(())
    }

    fn scan<W: Write>(&self, out: &mut W) -> anyhow::Result<()> {
        info!("scanning '{}'", self.document.display());
        let mut tokenizer = Tokenizer::open(self.document.as_path())?;
        while tokenizer
            .next_token()
            .with_context(|| format!("failed to scan '{}'", self.document.display()))?
            .is_some()
        {
            let indent = "  ".repeat(tokenizer.depth());
            write!(out, "{indent}{} {}", tokenizer.node_type(), tokenizer.name())?;
            if let Some(value) = tokenizer.value().filter(|value| !value.trim().is_empty()) {
                write!(out, " {value:?}")?;
            }
            writeln!(out)?;
        }
        Ok(())
    }

    fn properties<W: Write>(&self, names: &[String], out: &mut W) -> anyhow::Result<()> {
        let properties = names
            .iter()
            .map(|name| name.parse::<Property>())
            .collect::<Result<Vec<_>, _>>()?;
        let mut builder = TreeBuilder::open(self.document.as_path())
            .with_context(|| format!("failed to open '{}'", self.document.display()))?;
        while builder.property(Property::NodeType) != PropertyValue::NodeType(NodeType::Element) {
            if builder.invoke("read", &[])? == PropertyValue::Bool(false) {
                anyhow::bail!("document '{}' has no element", self.document.display());
            }
        }
        for property in properties {
            writeln!(out, "{property} = {}", builder.property(property))?;
        }
        Ok(())
    }
}
