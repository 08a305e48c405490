// ABOUTME: Larder CLI - command-line front end for the meal planning engine
// ABOUTME: Browses the catalog, manages the meal plan, and generates shopping lists
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project
//!
//! Usage:
//! ```bash
//! # Browse the first pages of the recipe catalog
//! larder browse --pages 2
//!
//! # Search the catalog
//! larder search --name curry --max-time 40 --exclude peanut
//!
//! # Schedule a meal
//! larder plan add --day 2025-06-10 --meal dinner --recipe-id 12 --recipe-name "Lentil Curry"
//!
//! # Show the plan for a range
//! larder plan show --start 2025-06-09 --end 2025-06-15
//!
//! # Generate a shopping list for a range
//! larder shopping generate --start 2025-06-09 --end 2025-06-15
//! ```

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use larder::catalog::CatalogStore;
use larder::config::environment::ClientConfig;
use larder::database::Database;
use larder::inventory::InventoryMirror;
use larder::logging::{init_logging, LoggingConfig};
use larder::models::{MealType, RecipeFilter};
use larder::plan::MealPlanner;
use larder::remote::{HttpCatalog, RemoteCatalog};
use larder::shopping::ShoppingService;

#[derive(Parser)]
#[command(
    name = "larder",
    about = "Meal planning client",
    long_about = "Command-line front end for the larder engine: browse the shared recipe catalog, schedule meals, and derive shopping lists from the gap between plan and pantry."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Database URL override
    #[arg(long, global = true)]
    database_url: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Browse the recipe catalog page by page
    Browse {
        /// How many pages to load
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Search the catalog with a filter
    Search {
        /// Name substring
        #[arg(long)]
        name: Option<String>,
        /// Minimum preparation time in minutes
        #[arg(long)]
        min_time: Option<u32>,
        /// Maximum preparation time in minutes
        #[arg(long)]
        max_time: Option<u32>,
        /// Allergens to exclude (repeatable)
        #[arg(long = "exclude")]
        exclude: Vec<String>,
    },
    /// Meal plan commands
    Plan {
        #[command(subcommand)]
        action: PlanCommand,
    },
    /// Shopping list commands
    Shopping {
        #[command(subcommand)]
        action: ShoppingCommand,
    },
    /// Show the pantry inventory
    Inventory,
}

#[derive(Subcommand)]
enum PlanCommand {
    /// Schedule a recipe into a meal slot
    Add {
        #[arg(long)]
        day: NaiveDate,
        #[arg(long)]
        meal: MealType,
        #[arg(long)]
        recipe_id: i64,
        #[arg(long)]
        recipe_name: String,
    },
    /// Remove one meal slot
    Remove {
        #[arg(long)]
        day: NaiveDate,
        #[arg(long)]
        meal: MealType,
    },
    /// Show the plan for a date range
    Show {
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
    },
}

#[derive(Subcommand)]
enum ShoppingCommand {
    /// Generate and persist a draft list for a date range
    Generate {
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
    },
    /// List stored shopping lists
    List,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = ClientConfig::from_env()?;
    if let Some(url) = cli.database_url {
        config.database_url = url;
    }
    init_logging(&LoggingConfig::from_env())?;

    let remote: Arc<dyn RemoteCatalog> = Arc::new(HttpCatalog::new(&config)?);

    match cli.command {
        Command::Browse { pages } => {
            let store = CatalogStore::new(Arc::clone(&remote), config.per_page);
            store.load_first_page().await;
            for _ in 1..pages {
                store.load_next_page().await;
            }
            let snapshot = store.browse_snapshot();
            if let Some(error) = snapshot.error {
                anyhow::bail!("catalog fetch failed: {error}");
            }
            for recipe in snapshot.items {
                println!(
                    "#{:<5} {:<40} {:>4} min  {} favorites",
                    recipe.id, recipe.name, recipe.prep_time_minutes, recipe.favorite_count
                );
            }
        }
        Command::Search { name, min_time, max_time, exclude } => {
            let store = CatalogStore::new(Arc::clone(&remote), config.per_page);
            let filter = RecipeFilter {
                name,
                min_time,
                max_time,
                exclude_allergens: exclude.into_iter().collect::<BTreeSet<_>>(),
            };
            store.apply_filter(filter).await;
            let snapshot = store.filtered_snapshot();
            if let Some(error) = snapshot.error {
                anyhow::bail!("catalog search failed: {error}");
            }
            for recipe in snapshot.items {
                println!("#{:<5} {:<40} {:>4} min", recipe.id, recipe.name, recipe.prep_time_minutes);
            }
        }
        Command::Plan { action } => {
            let db = Database::new(&config.database_url).await?;
            let planner = MealPlanner::new(db);
            match action {
                PlanCommand::Add { day, meal, recipe_id, recipe_name } => {
                    planner.assign_meal(day, meal, recipe_id, &recipe_name).await?;
                    println!("scheduled {recipe_name} for {meal} on {day}");
                }
                PlanCommand::Remove { day, meal } => {
                    if planner.remove_meal(day, meal).await? {
                        println!("removed {meal} on {day}");
                    } else {
                        println!("no {meal} scheduled on {day}");
                    }
                }
                PlanCommand::Show { start, end } => {
                    let range = larder::models::DateRange::new(start, end)?;
                    for day in planner.days_in_range(range).await? {
                        println!("{}", day.day);
                        for slot in &day.slots {
                            println!("  {:<10} {}", slot.meal_type.to_string(), slot.recipe_name);
                        }
                    }
                }
            }
        }
        Command::Shopping { action } => {
            let db = Database::new(&config.database_url).await?;
            let inventory = Arc::new(InventoryMirror::new(Arc::clone(&remote)));
            let service = ShoppingService::new(db, Arc::clone(&remote), inventory);
            match action {
                ShoppingCommand::Generate { start, end } => {
                    let list = service.generate(start, end).await?;
                    println!("list {} ({} items)", list.id, list.items.len());
                    for item in &list.items {
                        println!("  {:<30} {:>8.1} {}", item.name, item.quantity, item.unit);
                    }
                }
                ShoppingCommand::List => {
                    for list in service.stored_lists().await? {
                        println!(
                            "{}  {} → {}  {} items  {}",
                            list.id,
                            list.start_date,
                            list.end_date,
                            list.items.len(),
                            if list.completed { "completed" } else { "draft" }
                        );
                    }
                }
            }
        }
        Command::Inventory => {
            let inventory = InventoryMirror::new(Arc::clone(&remote));
            inventory.reload().await?;
            for item in inventory.items() {
                println!("{:<30} {:>8.1} {}", item.name, item.quantity, item.unit);
            }
        }
    }

    Ok(())
}
