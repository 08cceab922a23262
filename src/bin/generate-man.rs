// generates man page from clap CLI definition
// outputs to man/dcf.1

use clap::CommandFactory;
use clap_mangen::Man;
use conditional_fields::cli::Cli;

fn main() -> std::io::Result<()> {
    let cmd = Cli::command();
    let man = Man::new(cmd);

    std::fs::create_dir_all("man")?;

    let mut buffer = Vec::new();
    man.render(&mut buffer)?;
    std::fs::write("man/dcf.1", buffer)?;

    println!("Generated man/dcf.1");
    Ok(())
}
