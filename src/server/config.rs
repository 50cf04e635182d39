use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "revserve",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "Serve a git repository over HTTP, one revision per host name",
    long_about = "This server exposes the files of a git repository over HTTP. \
    The revision (branch, tag or commit hash) is taken from the request host, \
    e.g. main.example.org serves the tip of branch main. \
    Paths ending in a slash are rendered as directory listings.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
"
)]
pub struct Config {
    #[arg(long, default_value_t = 8080, help = "Port to listen on")]
    pub port: u16,
    #[arg(
        long,
        default_value = "",
        help = "Host to bind to, all interfaces when empty"
    )]
    pub host: String,
    #[arg(long, default_value = ".", help = "Repository to serve")]
    pub repo: PathBuf,
    #[arg(
        long,
        default_value = "templates/directory.html",
        help = "Template HTML to use for directory listings"
    )]
    pub tmpl: PathBuf,
    #[arg(
        long,
        help = "Base domain; the revision is everything in the host before it"
    )]
    pub domain: Option<String>,
}

impl Config {
    /// `host:port` to bind the listener to
    pub fn bind_address(&self) -> String {
        match self.host.as_str() {
            "" => format!("0.0.0.0:{}", self.port),
            host if host.contains(':') && !host.starts_with('[') => {
                format!("[{host}]:{}", self.port)
            }
            host => format!("{host}:{}", self.port),
        }
    }
}
