use clap::{Arg, ArgAction, Command};

pub fn build_cli() -> Command {
    Command::new("modelctl")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Deploy machine learning models from declarative YAML")
        .long_about("modelctl reads a project's deployment documents (one deployment and any number of APIs), validates them and shows the resulting resources before anything is deployed.")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("validate")
                .about("Load and validate deployment documents")
                .arg(
                    Arg::new("paths")
                        .help("Documents to load, in order (default: every YAML file under the project root)")
                        .num_args(0..)
                        .index(1)
                )
        )
        .subcommand(
            Command::new("get")
                .about("Show resources defined by the project")
                .arg(
                    Arg::new("type")
                        .help("Resource type, singular, plural or any unambiguous prefix (e.g. 'api', 'deployments', 'dep')")
                        .index(1)
                )
                .arg(
                    Arg::new("name")
                        .help("Resource name to describe")
                        .index(2)
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output format (overrides settings)")
                        .value_parser(["table", "json", "yaml"])
                )
        )
        .subcommand(
            Command::new("deployment-name")
                .about("Print the deployment name from the nearest modelctl.yaml")
        )
}
