use anyhow::Result;
use std::env;
use tracing::info;

use shopping_list::{
    load_records, logging, Config, DecimalStyle, EquivalenceResolver, GermanCollation,
    JsonStateStore, Operator, ReportFormatter, SectionCatalog, Session, SqliteStateStore,
    StateBackend, StateStore, UnitNormalizer,
};

fn main() -> Result<()> {
    logging::init();

    let config = Config::from_env()?.apply_args(env::args().skip(1))?;
    run(&config)
}

fn run(config: &Config) -> Result<()> {
    let input = config.input()?;

    // Registry faults are fatal before any record is touched
    let catalog = SectionCatalog::load(&config.sections_path)?;

    let store = open_store(config)?;
    let state = store.load()?;
    info!(
        store = %store.describe(),
        merges = state.equivalence.len(),
        classified = state.items_per_section.item_count(),
        "state loaded"
    );

    let records = load_records(input)?;

    let normalizer = UnitNormalizer::new(DecimalStyle::new(config.decimal_separator));
    let resolver = EquivalenceResolver::new(config.threshold, config.no_merge_label.clone());
    let mut operator = open_operator();

    let mut session = Session::new(state);
    session.ingest_all(&records, &normalizer, &resolver, operator.as_mut())?;
    session.classify_all(&catalog, &config.list_token, operator.as_mut())?;

    // Single write at the end; an interrupted run re-asks next time
    store.save(&session.state)?;
    session.log_summary();

    print!("{}", session.report(&ReportFormatter::new(&GermanCollation)));
    Ok(())
}

fn open_store(config: &Config) -> Result<Box<dyn StateStore>> {
    Ok(match config.backend {
        StateBackend::Json => Box::new(JsonStateStore::new(&config.state_path)),
        StateBackend::Sqlite => Box::new(SqliteStateStore::open(&config.state_path)?),
    })
}

#[cfg(feature = "tui")]
fn open_operator() -> Box<dyn Operator> {
    use std::io::IsTerminal;

    if std::io::stdin().is_terminal() && std::io::stdout().is_terminal() {
        Box::new(shopping_list::ui::TerminalOperator::new())
    } else {
        Box::new(shopping_list::StdioOperator::stdio())
    }
}

#[cfg(not(feature = "tui"))]
fn open_operator() -> Box<dyn Operator> {
    Box::new(shopping_list::StdioOperator::stdio())
}
