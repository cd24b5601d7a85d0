//! Command-line interface definitions and argument parsing

use crate::service::{CustomerInput, Gender};
use crate::store::DEFAULT_ARTIFACT_PATH;
use clap::Parser;

/// Customer segment prediction using a pre-trained clustering model bundle
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the serialized model bundle
    #[arg(short, long, default_value = DEFAULT_ARTIFACT_PATH)]
    pub model: String,

    /// Customer gender
    #[arg(short, long, value_enum, default_value = "male")]
    pub gender: Gender,

    /// Customer age in years
    #[arg(short, long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(18..=80))]
    pub age: u32,

    /// Annual income in thousands of dollars
    #[arg(short = 'i', long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(10..=150))]
    pub annual_income: u32,

    /// Spending score from 1 to 100
    #[arg(short, long, default_value_t = 50, value_parser = clap::value_parser!(u32).range(1..=100))]
    pub spending_score: u32,

    /// Output path for a PNG chart of the distances to all cluster centers
    #[arg(short, long)]
    pub chart: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Build the customer profile from the parsed arguments
    pub fn customer(&self) -> CustomerInput {
        CustomerInput {
            gender: self.gender,
            age: self.age,
            annual_income: self.annual_income,
            spending_score: self.spending_score,
        }
    }
}
