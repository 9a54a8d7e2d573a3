use std::fs::File;
use std::io::{self, BufReader, Seek, Write};
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use log::{debug, warn};

use ktnef::{extract_all, parse_with_options, ParseOptions, PropValue, TnefMessage};


/// Dumps the contents of a TNEF (winmail.dat) file.
#[derive(Parser)]
#[command(version)]
struct Opts {
    /// The TNEF file to read.
    file: PathBuf,

    /// Write all attachments into this directory.
    #[arg(short = 'x', long)]
    extract: Option<PathBuf>,

    /// Write the decompressed RTF body to standard output instead of dumping.
    #[arg(long)]
    rtf: bool,

    /// Reject attributes with a wrong checksum.
    #[arg(long)]
    verify_checksums: bool,

    /// Windows code page of 8-bit strings unless the file says otherwise.
    #[arg(long, default_value_t = 1252)]
    codepage: u16,
}


fn hexdump(bytes: &[u8], prefix: &str) {
    let mut i = 0;

    while i < bytes.len() {
        print!("{}{:08x}", prefix, i);
        for j in 0..16 {
            if i + j < bytes.len() {
                print!(" {:02x}", bytes[i + j]);
            } else {
                print!("   ");
            }
            if j == 7 {
                print!(" ");
            }
        }
        print!(" |");
        for j in 0..16 {
            if i + j < bytes.len() {
                let b = bytes[i + j];
                if (0x20..=0x7E).contains(&b) {
                    print!("{}", char::from(b));
                } else {
                    print!(".");
                }
            }
        }
        println!("|");

        i += 16;
    }
}

fn dump_value(value: &PropValue, prefix: &str) {
    match value {
        PropValue::Binary(bytes) | PropValue::Object(bytes) => {
            println!();
            hexdump(bytes, prefix);
        },
        other => println!("{}", other),
    }
}

fn dump(message: &TnefMessage) {
    println!("cross reference key: 0x{:04X}", message.cross_reference_key);

    println!("attributes:");
    for (tag, attribute) in message.properties.attributes() {
        println!("  0x{:04X} {:?}: {}", tag, attribute.id, attribute.value);
    }

    println!("properties:");
    for (key, property) in message.properties.properties() {
        match &property.name {
            Some(name) => print!("  0x{:04X} [{} {}] {:?}: ", key, name.guid, name.id, property.prop_type),
            None => print!("  0x{:04X} {:?}: ", key, property.prop_type),
        }
        dump_value(&property.value, "    ");
    }

    for (i, attachment) in message.attachments.iter().enumerate() {
        println!("attachment {}: {:?} ({}, {} bytes)", i, attachment.name, attachment.mime_tag, attachment.size);
        if !attachment.file_name.is_empty() {
            println!("  file name: {}", attachment.file_name);
        }
        if !attachment.display_name.is_empty() {
            println!("  display name: {}", attachment.display_name);
        }
        for (key, property) in attachment.properties.properties() {
            print!("  0x{:04X} {:?}: ", key, property.prop_type);
            dump_value(&property.value, "    ");
        }
    }
}

fn write_rtf(message: &TnefMessage) -> anyhow::Result<()> {
    let Some(compressed) = message.compressed_rtf() else {
        bail!("message has no compressed RTF body");
    };
    let rtf = ktnef::lzfu::decompress(compressed)
        .context("failed to decompress RTF body")?;
    let mut stdout = io::stdout().lock();
    stdout.write_all(&rtf)?;
    stdout.flush()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opts = Opts::parse();

    let options = match ParseOptions::new().with_codepage(opts.codepage) {
        Some(options) => options,
        None => {
            warn!("unknown code page {}; using the default", opts.codepage);
            ParseOptions::new()
        },
    }.with_checksum_verification(opts.verify_checksums);

    let file = File::open(&opts.file)
        .with_context(|| format!("failed to open {}", opts.file.display()))?;
    let mut reader = BufReader::new(file);
    let message = parse_with_options(&mut reader, options)
        .with_context(|| format!("failed to parse {}", opts.file.display()))?;
    debug!("parsed {} bytes", reader.stream_position()?);

    if opts.rtf {
        write_rtf(&message)?;
    } else {
        dump(&message);
    }

    if let Some(dir) = &opts.extract {
        let paths = extract_all(&message, &mut reader, dir)
            .with_context(|| format!("failed to extract attachments to {}", dir.display()))?;
        for path in paths {
            eprintln!("wrote {}", path.display());
        }
    }

    Ok(())
}
