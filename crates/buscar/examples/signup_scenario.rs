//! Signup Scenario Demo - label-text queries against a mock page
//!
//! Runs a YAML scenario through the step registry using the in-memory
//! `MockPage`, then prints each step's outcome.
//!
//! # Running
//!
//! ```bash
//! RUST_LOG=buscar=debug cargo run --example signup_scenario -p buscar
//! ```

#![allow(clippy::uninlined_format_args, clippy::unwrap_used)]

use std::sync::Arc;

use buscar::mock::{MockElement, MockPage};
use buscar::{logging, BuscarConfig, Scenario, ScenarioRunner};

const SCENARIO: &str = r#"
name: signup
steps:
  - When I find input by label text "Email"
  - And I set value "a@b.com"
  - Then I see value "a@b.com"
  - When I find element by label text "Bio"
  - And I type "Rustacean"
  - When I find select by display value "Rust"
  - Then I see value "rust"
  - step: When I find button by text "Sign up"
    table:
      - [log, "true"]
"#;

fn page() -> MockPage {
    MockPage::new(vec![MockElement::new("form").children([
        MockElement::new("label").attr("for", "email").text("Email"),
        MockElement::new("input").attr("id", "email").attr("type", "email"),
        MockElement::new("label")
            .text("Bio")
            .child(MockElement::new("textarea").attr("id", "bio")),
        MockElement::new("select").attr("id", "lang").children([
            MockElement::new("option").attr("value", "rust").text("Rust"),
            MockElement::new("option").attr("value", "go").text("Go"),
        ]),
        MockElement::new("button").attr("type", "submit").text("Sign up"),
    ])])
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    logging::init().unwrap();
    println!("=== Buscar Signup Scenario ===\n");

    let scenario = Scenario::from_yaml(SCENARIO).unwrap();
    let runner = ScenarioRunner::new(BuscarConfig::default()).unwrap();
    let result = runner.run(Arc::new(page()), &scenario).await;

    for step in &result.step_results {
        let mark = if step.passed { "ok  " } else { "FAIL" };
        println!("{} {} ({:?})", mark, step.text, step.duration);
        if let Some(error) = &step.error {
            println!("     {}", error);
        }
    }

    println!(
        "\nScenario {:?}: {} in {:?}",
        result.name,
        if result.passed { "passed" } else { "failed" },
        result.total_time
    );
}
