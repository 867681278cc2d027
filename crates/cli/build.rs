use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let mut cmd = clap::Command::new("ordbog")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Look words up on ordbogen.com")
        .arg(clap::arg!([WORD] "Word to look up; starts the interactive prompt when omitted"))
        .arg(clap::arg!(-d --dict <CODE> "Dictionary code to search in").default_value("auto"))
        .arg(
            clap::arg!(-f --format <FORMAT> "Output format for one-shot lookups")
                .default_value("text")
                .value_parser(["text", "json"]),
        )
        .arg(clap::arg!(--details "Print usage details under each word"))
        .arg(clap::arg!(--suggest "Print word completions instead of translations"))
        .arg(clap::arg!(--plain "Uncolored text output"))
        .arg(clap::arg!(--"list-dicts" "List every known dictionary code and exit"))
        .arg(clap::arg!(-u --username <USER> "Account username"))
        .arg(clap::arg!(-p --password <PASS> "Account password"))
        .arg(
            clap::arg!(--cookies <FILE> "Cookie store location")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(clap::arg!(--"no-persist" "Keep cookies in memory only"))
        .arg(clap::arg!(--"base-url" <URL> "Service root URL"))
        .arg(clap::arg!(--timeout <SECS> "HTTP timeout in seconds").default_value("30"))
        .arg(clap::arg!(--"user-agent" <UA> "Custom User-Agent for HTTP requests"))
        .arg(clap::arg!(-v --verbose "Enable debug logging"));

    clap_complete::generate_to(clap_complete::shells::Bash, &mut cmd, "ordbog", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Zsh, &mut cmd, "ordbog", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Fish, &mut cmd, "ordbog", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::PowerShell, &mut cmd, "ordbog", &completions_dir).unwrap();

    println!(
        "cargo:warning=Shell completions generated in: {}",
        completions_dir.display()
    );
}
