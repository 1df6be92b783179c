use saga_errors::{
    definitions, save_err, GameError, HandlerConfig, HandlerRegistry, Result,
};
use std::fs;
use std::path::Path;

fn load_save(dir: &Path, slot: u8) -> Result<String> {
    if slot == 0 || slot > 3 {
        return Err(save_err!(
            definitions::SAV_SLOT_INVALID,
            "load_save",
            "slot {} outside 1..=3",
            sanitized!(slot)
        ));
    }

    let path = dir.join(format!("slot{}.sav", slot));
    let raw = fs::read_to_string(&path).map_err(|e| {
        GameError::from_io_path(
            definitions::SAV_READ_FAILED,
            "load_save",
            path.display().to_string(),
            e,
        )
    })?;

    if !raw.starts_with("SAGA1") {
        return Err(GameError::save(definitions::SAV_CORRUPTED, "load_save", "missing header")
            .with_metadata("slot", slot.to_string()));
    }
    Ok(raw)
}

fn main() {
    let workdir = std::env::temp_dir().join("saga_errors_demo");
    let _ = fs::create_dir_all(&workdir);
    let _ = fs::write(workdir.join("slot2.sav"), "garbage");

    let mut registry = HandlerRegistry::new();
    let language = std::env::var("SAGA_LANG").unwrap_or_default();
    let config = HandlerConfig::new(true, Some(workdir.join("logs").join("game.log")))
        .with_language_tag(&language);
    let handler = registry.init_with_config(config);

    println!("--- Save / Load Example ---\n");

    for slot in [1u8, 2, 7] {
        handler.log_debug(&format!("loading slot {}", slot));
        match load_save(&workdir, slot) {
            Ok(_) => println!("Slot {}: loaded", slot),
            Err(err) => {
                // What the player sees
                let shown = handler.handle_error(&err, "load save", "");
                println!("Slot {}: {}", slot, shown);
                // What support sees in a bug report
                println!("         ({})", err);
            }
        }
    }

    println!("\nSession summary: {}", handler.get_error_statistics());
    for entry in handler.recent_errors(3) {
        println!("  {} [{}] {}", entry.timestamp.format("%H:%M:%S"), entry.code, entry.kind);
    }
    if let Some(path) = handler.config().log_file() {
        println!("\nFull diagnostics in {}", path.display());
    }
}
