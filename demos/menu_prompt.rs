use saga_errors::{validate_numeric_input, validate_option, GameError, HandlerRegistry};
use std::io::{self, BufRead, Write};

const ACTIONS: [&str; 3] = ["attack", "defend", "flee"];

fn prompt(label: &str) -> Option<String> {
    print!("{} ", label);
    io::stdout().flush().ok()?;
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_owned()),
    }
}

fn main() {
    let mut registry = HandlerRegistry::new();
    let handler = registry.init_error_handler(false, None);

    println!("A goblin blocks the path. Choose: {}", ACTIONS.join(" / "));
    let action = loop {
        let Some(answer) = prompt(">") else { return };
        match validate_option(&answer, &ACTIONS, false) {
            Ok(Some(index)) => break ACTIONS[index],
            Ok(None) => continue,
            Err(rejection) => {
                let reprompt = rejection.to_string();
                println!("{}", handler.handle_error(&GameError::from(rejection), "combat menu", &reprompt));
            }
        }
    };

    let potions = loop {
        let Some(answer) = prompt("Potions to drink first (0-3)?") else { return };
        match validate_numeric_input(&answer, 0, 3) {
            Ok(n) => break n,
            Err(rejection) => println!("{}", rejection),
        }
    };

    println!("\nYou {} after drinking {} potion(s).", action, potions);
    println!("Input mistakes this session: {}", handler.get_error_statistics());
}
