//! Example: Page objects driven by step text
//!
//! Demonstrates: pages, sections, forms and the step runner against the
//! in-memory driver
//!
//! Run with: `cargo run --example page_object_demo`

use pagehand::prelude::*;
use std::sync::Arc;

fn main() -> HarnessResult<()> {
    let _ = init_logging(false);
    println!("=== Page Object Example ===\n");

    // 1. A document to drive
    println!("1. Building the document...");
    let driver = Arc::new(MockDriver::new());
    let menu = driver.append(None, Node::new("nav").attr("id", "menu"));
    let _ = driver.append(Some(&menu), Node::new("a").attr("class", "link").text("Pricing"));
    let _ = driver.append(Some(&menu), Node::new("a").attr("class", "link").text("Docs"));
    let login = driver.append(None, Node::new("form").attr("id", "login"));
    let username = driver.append(Some(&login), Node::new("input").attr("name", "username"));
    let remember = driver.append(
        Some(&login),
        Node::new("input").attr("type", "checkbox").attr("name", "remember"),
    );
    let _ = driver.append(Some(&login), Node::new("button").attr("id", "go").text("Sign in"));
    println!("   Nodes: nav#menu, form#login");

    // 2. Page objects
    println!("\n2. Declaring pages...");
    let config = HarnessConfig::new().with_element_timeout(1).with_page_timeout(1);
    let home = Page::new("home", driver.clone(), "https://shop.test", "", config.clone())?
        .with_section(
            "menu",
            SectionSelector::new(Locator::id("menu"))
                .with_element("links", Locator::class_name("link").multiple()),
        );
    let credentials = Form::new()
        .with(TextInput::new("username"))?
        .with(CheckboxInput::new("remember"))?
        .with(Button::new("go").by(Strategy::Id).with_alias("submit"))?;
    let sign_in = Page::new("login", driver.clone(), "https://shop.test", "/login", config)?
        .with_form("credentials", credentials);
    println!("   {} -> {}", home.name(), home.url());
    println!("   {} -> {}", sign_in.name(), sign_in.url());

    // 3. Sections resolve inside their root
    println!("\n3. Resolving a section...");
    let links = home.section("menu")?.find_all("links")?;
    for link in &links {
        println!("   link: {}", driver.text(link)?);
    }

    // 4. Steps
    println!("\n4. Running steps...");
    let mut registry = PageRegistry::new();
    registry.add(home);
    registry.add(sign_in);
    let runner = StepRunner::new(registry)?;
    let steps = [
        "Given I go to the login page",
        r#"When I fill "username" with "ada" in the credentials form on the login page"#,
        r#"And I fill "remember" with "checked" in the credentials form on the login page"#,
        r#"Then I verify "remember" is "checked" in the credentials form on the login page"#,
        r#"When I click on "Sign in" on the login page"#,
    ];
    for step in steps {
        runner.run(step)?;
        println!("   ok: {step}");
    }
    println!(
        "   username = {:?}, remember = {}",
        driver.value_of(&username),
        driver.selected_of(&remember)
    );

    // 5. Failures carry the locator
    println!("\n5. Reporting a failure...");
    match runner.run(r#"Then I see "Welcome back" on the login page"#) {
        Ok(()) => println!("   unexpectedly found"),
        Err(err) => println!("   {err}"),
    }

    println!("\n=== Page Object Example Complete ===");
    Ok(())
}
