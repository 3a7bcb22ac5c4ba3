use borderseed_core::{WordlistIndex, normalize_word};

pub fn run(prefix: &str, json: bool) {
    let wordlist = WordlistIndex::english();
    let prefix = normalize_word(prefix);
    let matches = wordlist.complete_prefix(&prefix);

    if json {
        super::print_json(&matches);
        return;
    }

    if matches.is_empty() {
        eprintln!("No dictionary word starts with '{prefix}'");
        std::process::exit(1);
    }
    for word in matches {
        println!("{word}");
    }
}
