//! Seeds a demo book, prints it, and runs the standard matching scenarios.
//!
//! Set `BOOK_CONFIG` to a JSON file to override the engine configuration.

use std::env;
use std::fs;
use std::str::FromStr;

use anyhow::Context;
use lob_engine::view::{render_book, render_trades};
use lob_engine::{EngineConfig, MatchingEngine};
use lob_types::numeric::Price;
use lob_types::order::{Order, Side};
use rust_decimal::Decimal;

/// (side, price, quantity) of the resting orders loaded at startup
const DEFAULT_BOOK: &[(Side, &str, u64)] = &[
    (Side::BUY, "100.0", 1000),
    (Side::BUY, "99.9", 250),
    (Side::BUY, "99.8", 500),
    (Side::BUY, "99.7", 750),
    (Side::BUY, "99.6", 300),
    (Side::BUY, "99.5", 1200),
    (Side::BUY, "99.4", 400),
    (Side::BUY, "99.3", 600),
    (Side::BUY, "99.2", 200),
    (Side::BUY, "99.1", 450),
    (Side::BUY, "99.0", 800),
    (Side::BUY, "98.9", 350),
    (Side::BUY, "98.8", 550),
    (Side::BUY, "98.7", 150),
    (Side::BUY, "98.6", 700),
    (Side::BUY, "98.5", 900),
    (Side::SELL, "100.1", 200),
    (Side::SELL, "100.2", 450),
    (Side::SELL, "100.3", 600),
    (Side::SELL, "100.4", 300),
    (Side::SELL, "100.5", 800),
    (Side::SELL, "100.6", 400),
    (Side::SELL, "100.7", 950),
    (Side::SELL, "100.8", 250),
    (Side::SELL, "100.9", 550),
    (Side::SELL, "101.0", 1200),
    (Side::SELL, "101.1", 350),
    (Side::SELL, "101.2", 700),
    (Side::SELL, "101.3", 500),
    (Side::SELL, "101.4", 850),
    (Side::SELL, "101.5", 650),
    (Side::SELL, "101.6", 1000),
    // Clustered interest at support and resistance
    (Side::BUY, "99.5", 300),
    (Side::BUY, "99.5", 200),
    (Side::SELL, "101.0", 400),
    (Side::SELL, "101.0", 350),
];

struct Demo {
    engine: MatchingEngine,
    next_order_id: u64,
}

impl Demo {
    fn new(config: EngineConfig) -> Self {
        Self {
            engine: MatchingEngine::with_config(config),
            next_order_id: 1,
        }
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_order_id;
        self.next_order_id += 1;
        id
    }

    fn seed(&mut self) -> anyhow::Result<()> {
        for (side, price, quantity) in DEFAULT_BOOK {
            let price = Price::from_str(price)?;
            let id = self.next_id();
            let trades = self.engine.add_order(Order::limit(id, *side, price, *quantity));
            print!("{}", render_trades(&trades));
        }
        println!("Market initialized with {} orders", DEFAULT_BOOK.len());
        Ok(())
    }

    fn submit(&mut self, label: &str, order: Order) {
        println!("\n=== {} ===", label);
        let trades = self.engine.add_order(order);
        if trades.is_empty() {
            println!("No trades.");
        }
        print!("{}", render_trades(&trades));
        self.print_book();
    }

    fn print_book(&self) {
        print!("{}", render_book(&self.engine.default_snapshot()));
    }

    fn run_scenarios(&mut self) -> anyhow::Result<()> {
        let offset = Decimal::new(3, 1);

        let id = self.next_id();
        self.submit("MARKET BUY 500", Order::market(id, Side::BUY, 500));

        let id = self.next_id();
        self.submit("MARKET SELL 500", Order::market(id, Side::SELL, 500));

        let best_ask = self.engine.best_ask().context("no asks left for the aggressive buy")?;
        let price = Price::new(best_ask.as_decimal() + offset);
        let id = self.next_id();
        self.submit(
            &format!("AGGRESSIVE LIMIT BUY 800 @ {} (best ask {})", price, best_ask),
            Order::limit(id, Side::BUY, price, 800),
        );

        let best_bid = self.engine.best_bid().context("no bids left for the aggressive sell")?;
        let price = Price::new(best_bid.as_decimal() - offset);
        let id = self.next_id();
        self.submit(
            &format!("AGGRESSIVE LIMIT SELL 800 @ {} (best bid {})", price, best_bid),
            Order::limit(id, Side::SELL, price, 800),
        );

        Ok(())
    }
}

fn load_config() -> anyhow::Result<EngineConfig> {
    match env::var("BOOK_CONFIG") {
        Ok(path) => {
            let json = fs::read_to_string(&path).with_context(|| format!("reading {}", path))?;
            EngineConfig::from_json(&json).with_context(|| format!("parsing {}", path))
        }
        Err(_) => Ok(EngineConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let config = load_config()?;
    tracing::info!(instrument = %config.instrument, "Starting order book demo");

    let mut demo = Demo::new(config);
    demo.seed()?;
    demo.print_book();
    demo.run_scenarios()?;

    demo.engine
        .check_invariants()
        .context("book invariants violated after scenarios")?;
    Ok(())
}
