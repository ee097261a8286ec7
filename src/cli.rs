use clap::Parser;

#[derive(Parser)]
#[command(version, about = "Decode proxy share links into Clash proxy nodes", long_about = None)]
pub struct Args {
    #[arg(short, long, help = "Path to the newline-delimited link list")]
    pub input: String,

    #[arg(short, long, help = "Write the proxies document here instead of stdout")]
    pub output: Option<String>,

    #[arg(short, long, help = "Append decode reports to this log file")]
    pub log_file: Option<String>,

    #[arg(short, long, help = "Suppress console echo of decode reports")]
    pub quiet: bool,

    #[arg(short, long, help = "Emit debug log")]
    pub verbose: bool,
}
