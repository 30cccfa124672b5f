use camloop::LoopController;
use camloop::config::{AppConfig, CONFIG_FILE_NAME};
use camloop::console::{ConsoleCommand, HELP};
use camloop::engine::EngineEvent;
use config_loader::ConfigError;
use logging::Logger;
use media::DeviceDetection;
use std::io::{self, BufRead};
use std::process::ExitCode;
use std::sync::mpsc::Receiver;
use std::thread;

fn main() -> ExitCode {
    println!("camloop - starting...");

    let Some(config) = load_config() else {
        return ExitCode::FAILURE;
    };

    let Some(logger) = initialize_logger(&config) else {
        return ExitCode::FAILURE;
    };

    for warning in &config.warnings {
        logger.warn(warning);
    }

    let mut controller = match LoopController::start(&config.session, &logger) {
        Ok(controller) => controller,
        Err(e) => {
            logger.error(&format!("Startup failed: {}", e));
            eprintln!("{}", e.user_message());
            return ExitCode::FAILURE;
        }
    };

    if let Some(events) = controller.take_events() {
        spawn_event_printer(events, &logger);
    }

    println!("{}", HELP);
    run_console(&controller, &logger);

    if let Some(stats) = controller.stop() {
        println!("Stopped: {}", stats);
    }
    logger.info("camloop exiting");
    ExitCode::SUCCESS
}

/// Loads configuration from the path given as first argument, or from the
/// standard locations. Falls back to defaults only when no file exists.
fn load_config() -> Option<AppConfig> {
    let result = match std::env::args().nth(1) {
        Some(path) => AppConfig::load_from_file(&path).inspect(|_| {
            println!("Configuration loaded from: {}", path);
        }),
        None => match AppConfig::find_and_load() {
            Err(ConfigError::FileNotFound(_)) => {
                println!("No {} found, using defaults", CONFIG_FILE_NAME);
                Ok(AppConfig::default())
            }
            other => other,
        },
    };

    match result {
        Ok(config) => Some(config),
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            None
        }
    }
}

/// Initializes the main logger from configuration
fn initialize_logger(config: &AppConfig) -> Option<Logger> {
    let Some(log_path) = &config.log_path else {
        let logger = if config.log_console {
            Logger::console(config.log_level)
        } else {
            Logger::disabled()
        };
        return Some(logger.for_component("Main"));
    };

    match Logger::with_component(log_path, config.log_level, Some("Main"), config.log_console) {
        Ok(logger) => {
            println!(
                "Logging initialized: {} (level: {})",
                log_path.display(),
                config.log_level
            );
            Some(logger)
        }
        Err(e) => {
            eprintln!("Failed to create logger: {}", e);
            eprintln!("Cannot continue without logging system.");
            None
        }
    }
}

/// Echoes engine notifications until the loop stops.
fn spawn_event_printer(events: Receiver<EngineEvent>, logger: &Logger) {
    let result = thread::Builder::new()
        .name("events".to_string())
        .spawn(move || {
            for event in events {
                match event {
                    EngineEvent::CanLoopChanged(true) => {
                        println!("Replay window full: 'loop on' available")
                    }
                    EngineEvent::CanLoopChanged(false) => println!("Replay window not full"),
                    EngineEvent::ModeChanged(mode) => println!("Mode: {}", mode),
                    EngineEvent::GatheringChanged(on) => {
                        println!("Gathering {}", if on { "on" } else { "off" })
                    }
                    EngineEvent::Stopped(_) => break,
                }
            }
        });

    if let Err(e) = result {
        logger.warn(&format!("Event printer not started: {}", e));
    }
}

/// Reads commands from stdin until `quit` or end of input.
fn run_console(controller: &LoopController, logger: &Logger) {
    let stdin = io::stdin();

    for line in stdin.lock().lines() {
        let Ok(line) = line else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<ConsoleCommand>() {
            Ok(command) => command,
            Err(e) => {
                println!("{}. Type 'help' for commands.", e);
                continue;
            }
        };

        logger.debug(&format!("Console command: {:?}", command));
        match command {
            ConsoleCommand::Gather(on) => controller.set_gathering(on),
            ConsoleCommand::Loop(true) if !controller.can_loop() => {
                let (buffered, capacity) = controller.buffer_fill();
                println!(
                    "Cannot loop yet: buffer holds {} / {} frames",
                    buffered, capacity
                );
            }
            ConsoleCommand::Loop(on) => controller.set_looping(on),
            ConsoleCommand::Clear => controller.clear_buffer(),
            ConsoleCommand::Status => print_status(controller),
            ConsoleCommand::Devices => print_devices(logger),
            ConsoleCommand::Help => println!("{}", HELP),
            ConsoleCommand::Quit => break,
        }

        if !controller.is_running() {
            logger.error("Frame loop exited unexpectedly");
            break;
        }
    }
}

fn print_status(controller: &LoopController) {
    let (buffered, capacity) = controller.buffer_fill();
    println!(
        "mode: {}, gathering: {}, buffer: {} / {}{}",
        if controller.is_looping() { "replay" } else { "live" },
        if controller.is_gathering() { "on" } else { "off" },
        buffered,
        capacity,
        if controller.can_loop() { " (can loop)" } else { "" }
    );
}

fn print_devices(logger: &Logger) {
    let devices = DeviceDetection::list_devices(logger);
    if devices.is_empty() {
        println!("No video devices found");
        return;
    }
    for device in devices {
        println!(
            "{}  {}{}",
            device.path,
            device.name,
            if device.is_loopback { " (loopback)" } else { "" }
        );
    }
}
