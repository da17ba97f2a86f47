use std::env;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

use vdp_scanline::debug_flags;
use vdp_scanline::vdp::registers::REGISTER_COUNT;
use vdp_scanline::{render_frame, Rgb, VdpSnapshot, SCREEN_WIDTH, VISIBLE_LINES};

// Headless frame renderer
// Usage:
//   cargo run --bin render_frame -- frame.vdp --out frame.ppm
//   cargo run --bin render_frame -- dumps/ --raw --regs 04,44,30,2C,07,78,00,00,...
// Env: RENDER_OUT (default output path), DEBUG_DUMP_VRAM, DEBUG_RENDER, QUIET

struct Args {
    input: PathBuf,
    out: PathBuf,
    raw: bool,
    regs: [u8; REGISTER_COUNT],
}

// Register values are hex, with or without a 0x prefix.
fn parse_hex_u8(s: &str) -> Option<u8> {
    let s = s.trim();
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u8::from_str_radix(digits, 16).ok()
}

fn parse_regs(list: &str) -> Result<[u8; REGISTER_COUNT], String> {
    let mut regs = [0u8; REGISTER_COUNT];
    for (i, item) in list.split(',').enumerate() {
        if i >= REGISTER_COUNT {
            return Err(format!("at most {} register values are accepted", REGISTER_COUNT));
        }
        regs[i] = parse_hex_u8(item).ok_or_else(|| format!("bad register value '{}'", item))?;
    }
    Ok(regs)
}

fn parse_args<I: Iterator<Item = String>>(mut args: I) -> Result<Args, String> {
    let mut input: Option<PathBuf> = None;
    let mut out: Option<PathBuf> = None;
    let mut raw = false;
    let mut regs = [0u8; REGISTER_COUNT];

    while let Some(a) = args.next() {
        match a.as_str() {
            "--out" | "-o" => {
                let path = args.next().ok_or("--out needs a file path")?;
                out = Some(PathBuf::from(path));
            }
            "--raw" => {
                raw = true;
            }
            "--regs" => {
                let list = args.next().ok_or("--regs needs a comma separated list")?;
                regs = parse_regs(&list)?;
            }
            flag if flag.starts_with('-') => {
                return Err(format!("unknown option '{}'", flag));
            }
            _ => {
                if input.is_some() {
                    return Err(format!("unexpected extra argument '{}'", a));
                }
                input = Some(PathBuf::from(&a));
            }
        }
    }

    let input = input.ok_or("snapshot path (or raw dump directory) is required")?;
    let out = out
        .or_else(|| env::var("RENDER_OUT").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("frame.ppm"));

    Ok(Args {
        input,
        out,
        raw,
        regs,
    })
}

fn write_ppm(path: &Path, frame: &[Rgb]) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    write!(w, "P6\n{} {}\n255\n", SCREEN_WIDTH, VISIBLE_LINES)?;
    for px in frame {
        w.write_all(&[px.r, px.g, px.b])?;
    }
    w.flush()
}

fn main() {
    env_logger::init();

    let args = match parse_args(env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("usage: render_frame <snapshot|dump-dir> [--raw --regs r0,r1,...] [--out file.ppm]");
            process::exit(2);
        }
    };

    let loaded = if args.raw {
        VdpSnapshot::load_raw(&args.input, args.regs).map_err(|e| e.to_string())
    } else {
        VdpSnapshot::load_from_file(&args.input).map_err(|e| e.to_string())
    };
    let snapshot = match loaded {
        Ok(s) => s,
        Err(e) => {
            eprintln!("failed to load {}: {}", args.input.display(), e);
            process::exit(1);
        }
    };

    if debug_flags::dump_vram() {
        let dir = args
            .out
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        if let Err(e) = snapshot.dump_raw(&dir) {
            log::warn!("raw dump to {} failed: {}", dir.display(), e);
        }
    }

    let frame = match render_frame(&snapshot) {
        Ok(frame) => frame,
        Err(e) => {
            eprintln!("render failed: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = write_ppm(&args.out, &frame) {
        eprintln!("failed to write {}: {}", args.out.display(), e);
        process::exit(1);
    }

    if !debug_flags::quiet() {
        println!(
            "Rendered {}x{} frame to {}",
            SCREEN_WIDTH,
            VISIBLE_LINES,
            args.out.display()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> std::vec::IntoIter<String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn test_hex_register_values() {
        assert_eq!(parse_hex_u8("0x44"), Some(0x44));
        assert_eq!(parse_hex_u8("0X2C"), Some(0x2C));
        assert_eq!(parse_hex_u8(" 7f "), Some(0x7F));
        assert_eq!(parse_hex_u8("0x"), None);
        assert_eq!(parse_hex_u8("100"), None);
    }

    #[test]
    fn test_register_list() {
        let regs = parse_regs("04,0X44,30").unwrap();
        assert_eq!(&regs[..4], &[0x04, 0x44, 0x30, 0x00]);

        let too_many = vec!["00"; REGISTER_COUNT + 1].join(",");
        assert!(parse_regs(&too_many).is_err());
        assert!(parse_regs("04,zz").is_err());
    }

    #[test]
    fn test_full_command_line() {
        let parsed = parse_args(args(&["dumps", "--raw", "--regs", "04,44", "-o", "out.ppm"])).unwrap();
        assert_eq!(parsed.input, PathBuf::from("dumps"));
        assert_eq!(parsed.out, PathBuf::from("out.ppm"));
        assert!(parsed.raw);
        assert_eq!(&parsed.regs[..2], &[0x04, 0x44]);
    }

    #[test]
    fn test_usage_errors() {
        assert!(parse_args(args(&["a.vdp", "b.vdp"])).is_err());
        assert!(parse_args(args(&["a.vdp", "--out"])).is_err());
        assert!(parse_args(args(&["a.vdp", "--regs"])).is_err());
        assert!(parse_args(args(&["a.vdp", "--frames", "3"])).is_err());
        assert!(parse_args(args(&["--raw"])).is_err());
    }
}
