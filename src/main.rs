//! Savings Simulator CLI
//!
//! Simulate products from a catalog, manage the persisted comparison
//! selection, and compare everything selected.

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use savings_simulator::product::{load_catalog, Catalog};
use savings_simulator::selection::{FileBlobStore, SELECTION_KEY};
use savings_simulator::simulation::{project_deposit, SeriesCsvWriter};
use savings_simulator::{ProductDescriptor, ProductKind, ProductSimulation, Session, SimulationConfig};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "savings-sim", version, about = "Savings accumulation simulator")]
struct Cli {
    /// JSON file overriding simulation defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the persisted selection
    #[arg(long, global = true, default_value = ".savings-sim")]
    state_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Month-by-month accumulation for one saving product
    Simulate {
        #[arg(long)]
        catalog: PathBuf,
        #[arg(long)]
        code: String,
        /// Monthly contribution (defaults to the product hint, then the config default)
        #[arg(long)]
        monthly: Option<f64>,
        /// First contribution date; labels each month in the CSV output
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Write the full series to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Print the simulation as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Lump-sum projection for one deposit product
    Deposit {
        #[arg(long)]
        catalog: PathBuf,
        #[arg(long)]
        code: String,
        #[arg(long)]
        amount: f64,
        #[arg(long)]
        json: bool,
    },
    /// Manage the products selected for comparison
    Select {
        #[command(subcommand)]
        action: SelectAction,
    },
    /// Simulate every selected product
    Compare {
        /// Monthly contribution for savings
        #[arg(long)]
        monthly: Option<f64>,
        /// Lump sum for deposits
        #[arg(long)]
        amount: Option<f64>,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum SelectAction {
    /// Add a catalog product to the selection
    Add {
        #[arg(long)]
        catalog: PathBuf,
        #[arg(long)]
        code: String,
        #[arg(long)]
        kind: Option<ProductKind>,
    },
    /// Remove a product from the selection
    Remove {
        #[arg(long)]
        code: String,
        #[arg(long)]
        kind: ProductKind,
    },
    /// List selected products by kind
    List,
    /// Remove every selected product
    Clear,
}

fn find_product(catalog: &Catalog, code: &str, kind: Option<ProductKind>) -> Result<ProductDescriptor> {
    let found = match kind {
        Some(kind) => catalog.get(code, kind),
        None => catalog.find_code(code),
    };
    found
        .cloned()
        .ok_or_else(|| anyhow!("Product {} not found in catalog", code))
}

fn open_catalog(path: &Path) -> Result<Catalog> {
    load_catalog(path).with_context(|| format!("Failed to load catalog {}", path.display()))
}

fn print_simulation(sim: &ProductSimulation) {
    println!("{} ({} {})", sim.product.label(), sim.product.kind, sim.product.code);
    if let Some(company) = &sim.product.company_name {
        println!("  Company: {}", company);
    }
    println!("  Rate: {:.2}%  Term: {} months  Monthly: {:.0}",
        sim.product.annual_rate_percent(),
        sim.summary.months,
        sim.summary.monthly_contribution,
    );
    println!();
    println!("{:>5} {:>16} {:>14} {:>16}", "Month", "Principal", "Interest", "Total");
    println!("{}", "-".repeat(54));
    for point in &sim.series {
        println!("{:>5} {:>16.0} {:>14.0} {:>16.0}",
            point.month, point.principal, point.interest, point.total);
    }
    println!();
    println!("  Interest (pre-tax):  {:.0}", sim.summary.interest_before_tax());
    println!("  Tax withheld:        {:.0}", sim.summary.tax.tax_amount);
    println!("  Interest (after tax): {:.0}", sim.summary.interest_after_tax());
    println!("  Maturity (after tax): {:.0}", sim.summary.total_after_tax);
}

fn write_csv(path: &Path, start: Option<NaiveDate>, sims: &[ProductSimulation]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Unable to create {}", path.display()))?;
    let mut writer = SeriesCsvWriter::new(BufWriter::new(file), start);
    for sim in sims {
        writer.write_series(&sim.product.code, &sim.series)?;
    }
    writer.finish()?;
    println!("Series written to: {}", path.display());
    Ok(())
}

fn run_select(action: SelectAction, config: SimulationConfig, state_dir: &Path) -> Result<()> {
    let mut store = FileBlobStore::new(state_dir);
    let mut session = Session::restore(config, &store, SELECTION_KEY)
        .context("Failed to restore selection")?;

    match action {
        SelectAction::Add { catalog, code, kind } => {
            let catalog = open_catalog(&catalog)?;
            let product = find_product(&catalog, &code, kind)?;
            let label = format!("{} {}", product.kind, product.code);
            if session.select(product) {
                println!("Selected {}", label);
            } else {
                println!("{} is already selected", label);
            }
        }
        SelectAction::Remove { code, kind } => {
            if session.deselect(&code, kind) {
                println!("Removed {} {}", kind, code);
            } else {
                println!("{} {} was not selected", kind, code);
            }
        }
        SelectAction::List => {
            for (title, products) in [
                ("Savings", session.selected_savings()),
                ("Deposits", session.selected_deposits()),
            ] {
                println!("{} ({}):", title, products.len());
                for p in products {
                    println!("  {:<16} {}", p.code, p.label());
                }
            }
            return Ok(());
        }
        SelectAction::Clear => {
            session.clear_selection();
            println!("Selection cleared");
        }
    }

    session.save(&mut store, SELECTION_KEY).context("Failed to save selection")?;
    Ok(())
}

fn run_compare(
    config: SimulationConfig,
    state_dir: &Path,
    monthly: Option<f64>,
    amount: Option<f64>,
    json: bool,
) -> Result<()> {
    let store = FileBlobStore::new(state_dir);
    let session = Session::restore(config, &store, SELECTION_KEY)
        .context("Failed to restore selection")?;

    if session.selection().is_empty() {
        println!("Nothing selected. Use `savings-sim select add` first.");
        return Ok(());
    }

    let savings = session.simulate_selected(monthly);
    let deposits = amount
        .map(|a| session.project_selected_deposits(a))
        .unwrap_or_default();

    if json {
        let out = serde_json::json!({ "savings": savings, "deposits": deposits });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{:<16} {:>6} {:>8} {:>16} {:>14} {:>16}",
        "Saving", "Months", "Rate%", "Principal", "Interest", "After tax");
    println!("{}", "-".repeat(81));
    for sim in &savings {
        println!("{:<16} {:>6} {:>8.2} {:>16.0} {:>14.0} {:>16.0}",
            sim.product.code,
            sim.summary.months,
            sim.product.annual_rate_percent(),
            sim.summary.principal,
            sim.summary.interest_before_tax(),
            sim.summary.total_after_tax,
        );
    }

    if !deposits.is_empty() {
        println!();
        println!("{:<16} {:>6} {:>8} {:>16} {:>14} {:>16}",
            "Deposit", "Months", "Rate%", "Principal", "Interest", "After tax");
        println!("{}", "-".repeat(81));
        for dep in &deposits {
            println!("{:<16} {:>6} {:>8.2} {:>16.0} {:>14.0} {:>16.0}",
                dep.product.code,
                dep.projection.months,
                dep.product.annual_rate_percent(),
                dep.projection.principal,
                dep.projection.tax.interest_before_tax,
                dep.projection.total_after_tax,
            );
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = SimulationConfig::load(cli.config.as_deref()).context("Invalid simulation config")?;

    match cli.command {
        Command::Simulate { catalog, code, monthly, start, csv, json } => {
            let catalog = open_catalog(&catalog)?;
            let product = find_product(&catalog, &code, Some(ProductKind::Saving))?;
            let sim = Session::new(config).simulate(&product, monthly);

            if json {
                println!("{}", serde_json::to_string_pretty(&sim)?);
            } else {
                print_simulation(&sim);
            }
            if let Some(path) = csv {
                write_csv(&path, start, std::slice::from_ref(&sim))?;
            }
        }
        Command::Deposit { catalog, code, amount, json } => {
            let catalog = open_catalog(&catalog)?;
            let product = find_product(&catalog, &code, Some(ProductKind::Deposit))?;
            let projection = project_deposit(&config, &product, amount)
                .ok_or_else(|| anyhow!("{} is not a deposit product", code))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&projection)?);
            } else {
                println!("{} ({})", product.label(), product.code);
                println!("  Principal:            {:.0}", projection.principal);
                println!("  Term:                 {} months", projection.months);
                println!("  Interest (pre-tax):   {:.0}", projection.tax.interest_before_tax);
                println!("  Tax withheld:         {:.0}", projection.tax.tax_amount);
                println!("  Maturity (after tax): {:.0}", projection.total_after_tax);
            }
        }
        Command::Select { action } => run_select(action, config, &cli.state_dir)?,
        Command::Compare { monthly, amount, json } => {
            run_compare(config, &cli.state_dir, monthly, amount, json)?
        }
    }

    Ok(())
}
