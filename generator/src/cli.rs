use clap::Parser;

use crate::generators::Generator;

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    #[arg(help = "The schema file to compile; imported modules are loaded relative to it")]
    pub input: String,

    #[arg(long, help = "Allow a XML Document Type Definition (DTD) to occur")]
    pub allow_dtd: bool,

    #[arg(long, value_enum, default_value_t = Generator::default())]
    pub generator: Generator,
}
