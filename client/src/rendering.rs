//! Terminal presentation of the game.

use shared::Role;

pub fn clear_screen() {
    // ANSI clear plus cursor home; good enough for every modern terminal.
    print!("\x1b[2J\x1b[1;1H");
}

pub fn show_role(role: Role) {
    clear_screen();
    match role {
        Role::Setter => println!("You are the SETTER. Pick the secret word."),
        Role::Guesser => println!("You are the GUESSER. Waiting for the word to be set..."),
    }
}

pub fn show_waiting() {
    println!("Waiting for another player...");
}

pub fn show_state(display: &[u8], wrong: &[u8], remaining: u8) {
    clear_screen();
    println!("==============================");
    println!("Word:          {}", spaced(display));
    println!("Wrong letters: {}", spaced(&sorted(wrong)));
    println!("Attempts left: {}", remaining);
    println!("==============================");
}

pub fn show_round_end(headline: &str, word: &[u8]) {
    println!();
    println!("{}", headline);
    println!(
        "The word was: {}",
        String::from_utf8_lossy(word).to_uppercase()
    );
}

fn sorted(letters: &[u8]) -> Vec<u8> {
    let mut letters = letters.to_vec();
    letters.sort_unstable();
    letters
}

fn spaced(letters: &[u8]) -> String {
    letters
        .iter()
        .map(|&b| (b as char).to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spaced_rendering() {
        assert_eq!(spaced(b"c__"), "c _ _");
        assert_eq!(spaced(b""), "");
    }

    #[test]
    fn test_wrong_letters_render_sorted() {
        assert_eq!(sorted(b"zax"), b"axz".to_vec());
    }
}
