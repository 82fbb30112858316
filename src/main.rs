use incident_map::filter::parse;
use incident_map::{bounds, merge, summarize};
use log::info;
use std::error::Error;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(StructOpt)]
#[structopt(
    name = "incident_map",
    about = "Inspect and merge municipality & incident GeoJSON collections"
)]
enum Opt {
    /// Merge an uploaded incident payload into an existing collection
    Merge {
        /// Existing GeoJSON collection
        existing: PathBuf,
        /// Upload: GeoJSON or the custom {"incidents": [...]} format
        upload: PathBuf,
    },
    /// Print one summary line per feature
    Summary {
        /// GeoJSON collection
        file: PathBuf,
        /// Property selector, e.g. 'type~wildfire+status~confirmed,type~flood'
        #[structopt(short, long)]
        filter: Option<String>,
    },
    /// Print the union bounding box of a collection
    Bounds {
        /// GeoJSON collection
        file: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let opt = Opt::from_args();
    let stdout = io::stdout();
    let mut writer = stdout.lock();

    match opt {
        Opt::Merge { existing, upload } => {
            let existing = File::open(existing)?;
            let upload = File::open(upload)?;
            let (added, duplicates) = merge(existing, upload, &mut writer)?;
            info!("{} added, {} duplicates skipped", added, duplicates);
        }
        Opt::Summary { file, filter } => {
            let file = File::open(file)?;
            let groups = filter.map(|selector| parse(&selector));
            summarize(file, &mut writer, groups.as_deref())?;
        }
        Opt::Bounds { file } => {
            let file = File::open(file)?;
            bounds(file, &mut writer)?;
        }
    }
    Ok(())
}
