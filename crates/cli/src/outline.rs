use clap::Args;
use std::path::{Path, PathBuf};
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tagscope_api::{Symbol, SymbolMeta, SymbolProvider};
use tagscope_core::config::ProviderSettings;
use tagscope_core::provider::TreeSitterProvider;
use tracing::info;

#[derive(Args, Debug)]
pub struct OutlineArgs {
    /// Java source file to outline
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Tags query to use instead of the bundled one
    #[arg(long, value_name = "SCM")]
    pub query: Option<PathBuf>,

    /// Include references (calls, instantiations)
    #[arg(long)]
    pub references: bool,

    /// JSON settings file
    #[arg(long, value_name = "JSON")]
    pub settings: Option<PathBuf>,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Tabled)]
struct SymbolRow {
    #[tabled(rename = "Line")]
    line: String,
    #[tabled(rename = "Tag")]
    tag: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Context")]
    context: String,
}

impl From<&Symbol> for SymbolRow {
    fn from(symbol: &Symbol) -> Self {
        Self {
            line: symbol.position.to_string(),
            tag: symbol.tag.clone().unwrap_or_else(|| "-".to_string()),
            name: symbol.name.clone(),
            context: symbol.context.clone().unwrap_or_default(),
        }
    }
}

fn settings_for(args: &OutlineArgs) -> Result<ProviderSettings, Box<dyn std::error::Error>> {
    let mut settings = match &args.settings {
        Some(path) => ProviderSettings::load(path)?,
        None => ProviderSettings::default(),
    };
    if args.references {
        settings.include_references = true;
    }
    Ok(settings)
}

async fn outline_file(
    file: &Path,
    query: Option<&Path>,
    settings: ProviderSettings,
) -> Result<Vec<Symbol>, Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(file)?;
    let tags = match query {
        Some(path) => Some(tagscope_java::custom_tags_query(&std::fs::read_to_string(path)?)?),
        None => None,
    };
    let document = tagscope_java::java_document(&source, tags)?;

    let provider = TreeSitterProvider::new(settings);
    let symbols = provider
        .get_symbols(&SymbolMeta::file(&document))
        .await
        .unwrap_or_default();
    provider.destroy();
    Ok(symbols)
}

pub async fn run(args: &OutlineArgs) -> Result<String, Box<dyn std::error::Error>> {
    let settings = settings_for(args)?;
    info!(
        "Outlining {} (references: {})",
        args.file.display(),
        settings.include_references
    );

    let symbols = outline_file(&args.file, args.query.as_deref(), settings).await?;
    info!("Found {} symbols", symbols.len());

    if args.json {
        return Ok(serde_json::to_string_pretty(&symbols)?);
    }
    if symbols.is_empty() {
        return Ok("No symbols found.".to_string());
    }
    let rows: Vec<SymbolRow> = symbols.iter().map(SymbolRow::from).collect();
    Ok(Table::new(rows).with(Style::psql()).to_string())
}
