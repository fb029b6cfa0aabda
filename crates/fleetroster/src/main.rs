//! `fleetctl` - CLI for fleetroster
//!
//! This binary is the presentation layer over the roster: it parses a
//! command, applies it to the store, and prints the result.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::process::ExitCode;

use clap::Parser;

use fleetroster::cli::{
    AddCommand, Cli, Command, ConfigCommand, DeleteCommand, ListCommand, UpdateDriverCommand,
};
use fleetroster::{
    init_logging, Availability, Config, Filter, FleetStore, KeyValueStore, MemoryStore,
    SqliteStore, Vehicle,
};

type Store = FleetStore<Box<dyn KeyValueStore>>;

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_from(cli.config.clone())?;

    match cli.command {
        Command::Add(cmd) => handle_add(&mut open_store(&config)?, &config, &cmd),
        Command::List(cmd) => handle_list(&open_store(&config)?, &cmd),
        Command::UpdateDriver(cmd) => handle_update_driver(&mut open_store(&config)?, &cmd),
        Command::Toggle(cmd) => {
            let mut store = open_store(&config)?;
            let vehicle = store.toggle_availability(&cmd.id)?;
            println!("{} ({}) is now {}", vehicle.id, vehicle.reg_no, vehicle.availability);
            Ok(())
        }
        Command::Delete(cmd) => handle_delete(&mut open_store(&config)?, &cmd),
        Command::Status(cmd) => handle_status(&open_store(&config)?, &config, cmd.json),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn open_store(config: &Config) -> Result<Store, Box<dyn std::error::Error>> {
    let backend: Box<dyn KeyValueStore> = if config.storage.in_memory {
        Box::new(MemoryStore::new())
    } else {
        Box::new(SqliteStore::open(config.database_path())?)
    };

    let store = FleetStore::load_with_key(backend, config.storage.key.clone())?
        .with_default_image(config.fleet.default_image.clone());
    Ok(store)
}

fn handle_add(
    store: &mut Store,
    config: &Config,
    cmd: &AddCommand,
) -> Result<(), Box<dyn std::error::Error>> {
    // A blank category is left for the store to reject.
    let category = cmd.category.trim();
    if !category.is_empty() && !config.is_known_category(category) {
        return Err(format!(
            "unknown category '{category}', expected one of: {}",
            config.fleet.categories.join(", ")
        )
        .into());
    }

    let vehicle = store.add(&cmd.reg_no, category, &cmd.driver_name, cmd.availability())?;
    println!("Added vehicle {}", vehicle.id);
    print_vehicle(&vehicle);
    Ok(())
}

fn handle_list(store: &Store, cmd: &ListCommand) -> Result<(), Box<dyn std::error::Error>> {
    let availability: Filter<Availability> = cmd.availability.into();
    let vehicles = store.list(&cmd.category_filter(), &availability);

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&vehicles)?);
        return Ok(());
    }

    if vehicles.is_empty() {
        println!("No vehicles to show.");
        return Ok(());
    }

    println!(
        "{:<15} {:<14} {:<8} {:<20} AVAILABILITY",
        "ID", "REG", "CATEGORY", "DRIVER"
    );
    for vehicle in vehicles {
        println!(
            "{:<15} {:<14} {:<8} {:<20} {}",
            vehicle.id, vehicle.reg_no, vehicle.category, vehicle.driver_name, vehicle.availability
        );
    }
    Ok(())
}

fn handle_update_driver(
    store: &mut Store,
    cmd: &UpdateDriverCommand,
) -> Result<(), Box<dyn std::error::Error>> {
    let vehicle = store.update_driver(&cmd.id, &cmd.name)?;
    println!("Driver of {} ({}) is now {}", vehicle.id, vehicle.reg_no, vehicle.driver_name);
    Ok(())
}

fn handle_delete(store: &mut Store, cmd: &DeleteCommand) -> Result<(), Box<dyn std::error::Error>> {
    if !cmd.yes {
        match store.get(&cmd.id) {
            Some(vehicle) => {
                println!("This will delete the following vehicle:");
                print_vehicle(vehicle);
                println!("Use --yes to confirm.");
            }
            None => println!("No vehicle with id {}.", cmd.id),
        }
        return Ok(());
    }

    if store.delete(&cmd.id)? {
        println!("Deleted vehicle {}", cmd.id);
    } else {
        println!("No vehicle with id {}; nothing deleted.", cmd.id);
    }
    Ok(())
}

fn handle_status(
    store: &Store,
    config: &Config,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let stats = store.stats();
    let location = if config.storage.in_memory {
        "(in memory)".to_string()
    } else {
        config.database_path().display().to_string()
    };

    let size = store.backend().size_bytes();

    if json {
        let status = serde_json::json!({
            "storage": location,
            "size_bytes": size,
            "key": store.storage_key(),
            "load_error": store.load_error().map(ToString::to_string),
            "stats": stats,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("fleetctl status");
        println!("---------------");
        println!("Storage:       {location}");
        if let Some(bytes) = size {
            println!("Size:          {bytes} bytes");
        }
        println!("Key:           {}", store.storage_key());
        if let Some(e) = store.load_error() {
            println!("Load error:    {e}");
        }
        println!("Vehicles:      {}", stats.total);
        println!("  Available:   {}", stats.available);
        println!("  Unavailable: {}", stats.unavailable);
        for (category, count) in &stats.by_category {
            println!("  {category:<12} {count}");
        }
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:  {}", config.database_path().display());
                println!("  Key:            {}", config.storage.key);
                println!("  In memory:      {}", config.storage.in_memory);
                println!();
                println!("[Fleet]");
                println!("  Categories:     {}", config.fleet.categories.join(", "));
                println!("  Default image:  {}", config.fleet.default_image);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}

fn print_vehicle(vehicle: &Vehicle) {
    println!("  Reg:          {}", vehicle.reg_no);
    println!("  Category:     {}", vehicle.category);
    println!("  Driver:       {}", vehicle.driver_name);
    println!("  Availability: {}", vehicle.availability);
}
