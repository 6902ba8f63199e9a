use clap::{arg, crate_version, Command};
use pactool::archive::{reader, writer};
use pactool::compression::Method;

const RCH: &str = "unreachable was reached";

fn resolve_codepage(cmd: &clap::ArgMatches) -> Result<Option<&'static encoding_rs::Encoding>, Box<dyn std::error::Error>> {
    match cmd.get_one::<String>("codepage") {
        None => Ok(None),
        Some(label) => pactool::codepage::resolve(label)
            .map(Some)
            .ok_or_else(|| format!("unrecognized codepage `{label}`").into()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let long_help = "Examples:
---------
Pack:    `pactool pack --method zlib my_archive.pac my_directory`
Unpack:  `pactool unpack my_archive.pac my_directory`";

    let mut main_cmd = Command::new("pactool")
        .about("Pack and unpack PAC archives")
        .after_long_help(long_help)
        .version(crate_version!())
        .arg(arg!(-v --verbose "raise log verbosity").global(true).action(clap::ArgAction::SetTrue));

    main_cmd = main_cmd.subcommand(
        Command::new("pack")
            .about("pack a directory into an archive")
            .arg(arg!(-m --method <METHOD> "compression method").value_parser(["no", "zlib", "zstd"]).default_value("no"))
            .arg(arg!(-j --jobs <N> "worker count, 0 = auto").value_parser(clap::value_parser!(usize)).default_value("0"))
            .arg(arg!(--codepage <NAME> "transcode names from this codepage when writing"))
            .arg(arg!(<ARCHIVE> "archive path"))
            .arg(arg!(<SOURCE_DIR> "directory to pack")),
    );

    main_cmd = main_cmd.subcommand(
        Command::new("unpack")
            .about("unpack an archive into a directory")
            .arg(arg!(-j --jobs <N> "worker count, 0 = auto").value_parser(clap::value_parser!(usize)).default_value("0"))
            .arg(arg!(--codepage <NAME> "transcode names into this codepage when extracting"))
            .arg(arg!(<ARCHIVE> "archive path"))
            .arg(arg!(<TARGET_DIR> "directory to extract into")),
    );

    let matches = main_cmd.get_matches();

    let mut builder = env_logger::Builder::from_default_env();
    if matches.get_flag("verbose") {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();

    if let Some(cmd) = matches.subcommand_matches("pack") {
        let archive = cmd.get_one::<String>("ARCHIVE").expect(RCH);
        let source_dir = cmd.get_one::<String>("SOURCE_DIR").expect(RCH);
        let method_str = cmd.get_one::<String>("method").expect(RCH);
        let jobs = *cmd.get_one::<usize>("jobs").expect(RCH);
        let method: Method = method_str.parse().map_err(|e: String| e)?;
        let codepage = resolve_codepage(cmd)?;

        let summary =
            writer::pack(std::path::Path::new(source_dir), std::path::Path::new(archive), method, jobs, codepage)?;
        log::info!(
            "packed {} entries ({} skipped) in {} ms",
            summary.entries_written,
            summary.entries_skipped,
            summary.elapsed.as_millis()
        );
    }

    if let Some(cmd) = matches.subcommand_matches("unpack") {
        let archive = cmd.get_one::<String>("ARCHIVE").expect(RCH);
        let target_dir = cmd.get_one::<String>("TARGET_DIR").expect(RCH);
        let jobs = *cmd.get_one::<usize>("jobs").expect(RCH);
        let codepage = resolve_codepage(cmd)?;

        let summary =
            reader::unpack(std::path::Path::new(archive), std::path::Path::new(target_dir), jobs, codepage)?;
        log::info!(
            "extracted {} entries ({} failed) in {} ms",
            summary.entries_extracted,
            summary.entries_failed,
            summary.elapsed.as_millis()
        );
    }

    Ok(())
}
