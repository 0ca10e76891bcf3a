// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 rhythmcache

use clap::Parser;
use std::path::PathBuf;

use crate::cli::commands::metadata_saver::MetadataTarget;

const VERSION_STRING: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\n\n",
    "Copyright (C) 2025 rhythmcache\n",
    "License Apache-2.0: Apache License 2.0 <https://www.apache.org/licenses/LICENSE-2.0>\n",
    "\n",
    "This is free software; you are free to change and redistribute it.\n",
    "There is NO WARRANTY, to the extent permitted by law.\n",
    "\n",
    "Build Information:\n",
    "  Version:    ",
    env!("CARGO_PKG_VERSION"),
    "\n",
    "  Git:        ",
    env!("GIT_COMMIT_SHORT"),
    " (",
    env!("GIT_BRANCH"),
    ")",
    "\n",
    "  Built:      ",
    env!("BUILD_TIMESTAMP"),
    "\n",
    "  Rustc:      ",
    env!("RUSTC_VERSION"),
    "\n",
    "  Host:       ",
    env!("BUILD_HOST"),
    "\n",
    "  Target:     ",
    env!("BUILD_TARGET"),
    "\n",
    "  Profile:    ",
    env!("BUILD_PROFILE"),
    "\n"
);

#[derive(Parser, Debug)]
#[command(
    version = VERSION_STRING,
    about = "Extract the programmed app partition from an OTA flash image"
)]
#[command(next_line_help = true)]
pub struct Args {
    #[arg(value_name = "IMAGE_IN", help = "Raw flash image to extract from")]
    pub image: PathBuf,

    #[arg(
        value_name = "PARTITIONS_IN",
        help = "Partition table in CSV form (name, type, subtype, offset, size)"
    )]
    pub partitions: PathBuf,

    #[arg(
        value_name = "IMAGE_OUT",
        help = "Where to write the extracted app partition (overwritten if present)"
    )]
    pub out: PathBuf,

    #[arg(
        short = 'l',
        long,
        help = "List the partition table and the state of each app slot"
    )]
    pub list: bool,

    #[arg(
        short = 'm',
        long,
        value_name = "PATH",
        num_args = 0..=1,
        require_equals = true,
        help = "Save extraction metadata as JSON",
        long_help = "Save extraction metadata as JSON:\n  \
                     --metadata        Write next to the output as <IMAGE_OUT>.json\n  \
                     --metadata=PATH   Write to PATH\n  \
                     --metadata=-      Write to stdout"
    )]
    pub metadata: Option<Option<PathBuf>>,

    #[arg(short = 'n', long, help = "Skip re-reading the output to verify its hash")]
    pub no_verify: bool,

    #[arg(
        short = 'q',
        long,
        help = "Suppress all non-essential output (errors will still be shown)"
    )]
    pub quiet: bool,
}

impl Args {
    pub fn metadata_target(&self) -> Option<MetadataTarget> {
        self.metadata
            .as_ref()
            .map(|path| MetadataTarget::resolve(path.as_deref(), &self.out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn three_positionals_are_required() {
        let err = Args::try_parse_from(["ota-extract", "flash.bin", "partitions.csv"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);

        let err = Args::try_parse_from(["ota-extract", "a", "b", "c", "d"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn metadata_flag_forms() {
        let args = Args::try_parse_from(["ota-extract", "a", "b", "out.bin"]).unwrap();
        assert_eq!(args.metadata_target(), None);

        let args =
            Args::try_parse_from(["ota-extract", "a", "b", "out.bin", "--metadata"]).unwrap();
        assert_eq!(
            args.metadata_target(),
            Some(MetadataTarget::File(PathBuf::from("out.bin.json")))
        );

        let args =
            Args::try_parse_from(["ota-extract", "-m=meta.json", "a", "b", "out.bin"]).unwrap();
        assert_eq!(
            args.metadata_target(),
            Some(MetadataTarget::File(PathBuf::from("meta.json")))
        );

        let args =
            Args::try_parse_from(["ota-extract", "a", "b", "out.bin", "--metadata=-"]).unwrap();
        assert_eq!(args.metadata_target(), Some(MetadataTarget::Stdout));
    }
}
