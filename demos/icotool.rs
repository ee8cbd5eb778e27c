use clap::{App, Arg, SubCommand};
use icopack::{Filter, IconDirectory, IconImage, RgbaRasterizer, SizePreset};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process;

//===========================================================================//

fn main() {
    env_logger::init();
    let matches = App::new("icotool")
        .version("0.1")
        .about("Packs PNG images into ICO files")
        .subcommand(
            SubCommand::with_name("create")
                .about("Creates an ICO file from PNG files of icon size")
                .arg(
                    Arg::with_name("output")
                        .takes_value(true)
                        .value_name("PATH")
                        .short("o")
                        .long("output")
                        .help("Sets output path"),
                )
                .arg(Arg::with_name("image").multiple(true).required(true)),
        )
        .subcommand(
            SubCommand::with_name("generate")
                .about("Creates an ICO file by resizing one source PNG")
                .arg(
                    Arg::with_name("output")
                        .takes_value(true)
                        .value_name("PATH")
                        .short("o")
                        .long("output")
                        .help("Sets output path"),
                )
                .arg(
                    Arg::with_name("preset")
                        .takes_value(true)
                        .value_name("PRESET")
                        .short("p")
                        .long("preset")
                        .possible_values(&["windows", "favicon", "canonical"])
                        .help("Uses a fixed size set instead of the sizes \
                               recommended for the source"),
                )
                .arg(
                    Arg::with_name("filter")
                        .takes_value(true)
                        .value_name("FILTER")
                        .short("f")
                        .long("filter")
                        .possible_values(&["nearest", "triangle", "lanczos3"])
                        .help("Sets the resampling filter"),
                )
                .arg(Arg::with_name("source").required(true)),
        )
        .subcommand(
            SubCommand::with_name("list")
                .about("Lists images in an ICO file")
                .arg(Arg::with_name("ico").required(true)),
        )
        .get_matches();
    let result = if let Some(submatches) = matches.subcommand_matches("create")
    {
        let paths: Vec<&str> = submatches.values_of("image").unwrap().collect();
        create(&paths, output_path(submatches.value_of("output")))
    } else if let Some(submatches) = matches.subcommand_matches("generate") {
        generate(
            submatches.value_of("source").unwrap(),
            submatches.value_of("preset"),
            submatches.value_of("filter"),
            output_path(submatches.value_of("output")),
        )
    } else if let Some(submatches) = matches.subcommand_matches("list") {
        list(submatches.value_of("ico").unwrap())
    } else {
        eprintln!("{}", matches.usage());
        process::exit(2);
    };
    if let Err(error) = result {
        eprintln!("error: {}", error);
        process::exit(1);
    }
}

fn output_path(path: Option<&str>) -> PathBuf {
    if let Some(path) = path {
        return PathBuf::from(path);
    }
    let mut path = PathBuf::from("out.ico");
    let mut index: i32 = 0;
    while path.exists() {
        index += 1;
        path = PathBuf::from(format!("out{}.ico", index));
    }
    path
}

//===========================================================================//

fn create(paths: &[&str], out_path: PathBuf) -> io::Result<()> {
    let mut images = Vec::with_capacity(paths.len());
    for path in paths {
        let image = IconImage::from_png(fs::read(path)?)?;
        println!("Adding {:?} ({})", path, image.size());
        images.push(image);
    }
    fs::write(&out_path, icopack::encode(images)?)?;
    println!("Wrote {:?}", out_path);
    Ok(())
}

fn generate(
    source_path: &str,
    preset: Option<&str>,
    filter: Option<&str>,
    out_path: PathBuf,
) -> io::Result<()> {
    let file = fs::File::open(source_path)?;
    let mut source = RgbaRasterizer::from_png(file)?;
    if let Some(filter) = filter {
        source = source.with_filter(filter.parse::<Filter>()?);
    }
    let sizes = match preset {
        Some(name) => name.parse::<SizePreset>()?.sizes().to_vec(),
        None => icopack::recommended_sizes(source.width(), source.height()),
    };
    let names: Vec<String> = sizes.iter().map(|size| size.to_string()).collect();
    println!(
        "Resizing {}x{} source to {}",
        source.width(),
        source.height(),
        names.join(", ")
    );
    fs::write(&out_path, icopack::build_icon(&mut source, &sizes)?)?;
    println!("Wrote {:?}", out_path);
    Ok(())
}

fn list(path: &str) -> io::Result<()> {
    let (icondir, offsets) =
        IconDirectory::read_with_offsets(fs::File::open(path)?)?;
    for (index, (image, offset)) in
        icondir.images().iter().zip(offsets.iter()).enumerate()
    {
        let kind = if image.is_png() { "PNG" } else { "not PNG" };
        println!(
            "{:5}: {} {}, {} bytes at offset {}",
            index,
            image.size(),
            kind,
            image.byte_length(),
            offset
        );
    }
    Ok(())
}

//===========================================================================//
