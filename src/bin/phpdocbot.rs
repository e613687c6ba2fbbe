use irc_phpdoc::php::{ManualKind, ManualSource, ManualSourceConfig, DEFAULT_LANGUAGE};
use irc_phpdoc::plugin::PhpPlugin;
use std::env;
use std::process;
use std::str::FromStr;
use std::sync::Arc;

#[macro_use]
extern crate log;

fn usage(opts: &getopts::Options) -> String {
    opts.usage("Usage: phpdocbot --host HOSTNAME --nick NICK [options]\n       phpdocbot --lookup NAME [options]")
}

fn fail(msg: &str) -> ! {
    error!("{}", msg);
    eprintln!("{}", msg);
    process::exit(1);
}

fn manual_config(matches: &getopts::Matches) -> ManualSourceConfig {
    let kind = match matches.opt_str("manual-type") {
        Some(s) => ManualKind::from_str(&s).unwrap_or_else(|e| fail(&e.to_string())),
        None => ManualKind::Online,
    };
    let language = matches.opt_str("manual-lang").unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
    ManualSourceConfig::new(kind, matches.opt_str("manual-path").as_deref(), &language)
}

fn main() {
    env_logger::init();

    let mut opts = getopts::Options::new();
    opts.optopt("", "host", "irc server hostname", "HOSTNAME");
    opts.optopt("", "port", "irc server port", "PORT");
    opts.optopt("n", "nick", "nickname", "NICK");
    opts.optmulti("c", "chan", "channels to join", "CHAN");
    opts.optopt("", "manual-type", "online, single or many", "TYPE");
    opts.optopt("", "manual-path", "manual base url, file or directory", "PATH");
    opts.optopt("", "manual-lang", "manual language (online only)", "LANG");
    opts.optopt("", "lookup", "look one function up, print the answer and exit", "NAME");
    opts.optflag("h", "help", "print this help");

    let args: Vec<String> = env::args().collect();
    let matches = opts.parse(&args[1..]).unwrap_or_else(|e| fail(&format!("{}\n{}", e, usage(&opts))));
    if matches.opt_present("help") {
        println!("{}", usage(&opts));
        return;
    }

    let source = ManualSource::from_config(&manual_config(&matches))
        .unwrap_or_else(|e| fail(&e.to_string()));
    let source = Arc::new(source);

    if let Some(name) = matches.opt_str("lookup") {
        println!("{}", PhpPlugin::new(source, "").lookup(&name));
        return;
    }

    let host = matches.opt_str("host").unwrap_or_else(|| fail("must provide --host"));
    let port = match matches.opt_str("port") {
        Some(p) => u16::from_str(&p).unwrap_or_else(|_| fail(&format!("bad --port \"{}\"", p))),
        None => 6667,
    };
    let nick = matches.opt_str("nick").unwrap_or_else(|| fail("must provide --nick"));
    let channels = matches.opt_strs("chan");

    let addr = (host.as_str(), port);
    let (mut client, join_handle) = irc_phpdoc::Client::connect(
        &addr, &nick, &channels.iter().map(|s| s.as_str()).collect::<Vec<&str>>(), "phpdocbot", "php manual robot")
        .unwrap_or_else(|e| fail(&format!("Error connecting to {:?}: {}", addr, e)));

    info!("Answering PHP questions on {}.", client.server());
    let replier = client.replier();
    client.add_handler(PhpPlugin::new(source, &nick).handler(replier));
    join_handle.join().unwrap_or_else(|_| { error!("Unknown error!"); });
}
