use memviewlib::{
    Converter, EditorOptions, Endianness, MemoryEditor, NumericFormat, NumericType, Rendered,
    codec,
};
use std::env;
use std::path::PathBuf;
use std::process;

fn print_usage() {
    let version = env!("CARGO_PKG_VERSION");

    println!(" ----------------------------------------------------------------");
    println!("|  Memory View Utility  | v{version} - Copyright (c) 2026 Ihar Hlukhau |");
    println!(" ----------------------------------------------------------------");
    println!("\nUsage:");
    println!("  memcli inspect <input> <offset> [options]");
    println!("  memcli convert <value> --type <type> [options]");
    println!("  memcli dump <input> [options]");
    println!("\nOptions:");
    println!("  --type <type>      Numeric type: i8 u8 i16 u16 i32 u32 i64 u64 f16 f32 f64");
    println!("  --endian <le|be>   Byte order used by inspect (default: le)");
    println!("  --format <fmt>     Text format of the convert value: bin, dec, hex (default: dec)");
    println!("  --to <type>        Type to convert the value to");
    println!("  --cols <val>       Bytes per row for dump (default: 16)");
    println!("  --offset <val>     First offset (hex) to dump");
    println!("  --rows <val>       Number of rows to dump");
    println!("  --base <val>       Address (hex) displayed for offset 0");
    println!("\nExamples:");
    println!("  memcli inspect firmware.bin 0x10 --type f32 --endian be");
    println!("  memcli convert -300 --type i16 --to u16");
    println!("  memcli convert 0x3c00 --type f16 --format hex");
    println!("  memcli dump firmware.bin --offset 0x100 --rows 4 --base 0x08000000");
}

fn main() {
    let args: Vec<String> = env::args().collect();

    println!();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = &args[1];

    // Dispatch and immediately handle results
    if let Err(e) = run_dispatch(command, &args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run_dispatch(cmd: &str, args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        "help" | "-h" | "--help" => {
            print_usage();
            Ok(())
        }
        "inspect" => {
            // Guard: Check args count
            let path_str = args.get(2).ok_or("Missing input file path")?;
            let offset_str = args.get(3).ok_or("Missing offset")?;

            // Guard: File must exist
            let abs_path = validate_exists(path_str)?;

            let offset =
                parse_hex_str(offset_str).map_err(|_e| format!("Invalid offset: {offset_str}"))?;

            let ntype = get_flag_value(args, "--type")
                .map(|t| t.parse::<NumericType>())
                .transpose()?;
            let endianness = get_flag_value(args, "--endian")
                .map(|e| e.parse::<Endianness>())
                .transpose()?
                .unwrap_or_default();

            run_inspect(&abs_path, offset, ntype, endianness)
        }
        "convert" => {
            // Guard: Check value given
            let value = args.get(2).ok_or("Missing value to convert")?;

            let ntype = get_flag_value(args, "--type")
                .ok_or("Missing '--type' flag or the value after it")?
                .parse::<NumericType>()?;
            let format = get_flag_value(args, "--format")
                .map(|f| f.parse::<NumericFormat>())
                .transpose()?
                .unwrap_or(NumericFormat::Decimal);
            let target = get_flag_value(args, "--to")
                .map(|t| t.parse::<NumericType>())
                .transpose()?;

            run_convert(value, ntype, format, target)
        }
        "dump" => {
            // Guard: Check args count
            let path_str = args.get(2).ok_or("Missing input file path")?;

            // Guard: File must exist
            let abs_path = validate_exists(path_str)?;

            let mut options = EditorOptions::default();
            if let Some(cols) = get_flag_value(args, "--cols") {
                options.cols = cols
                    .parse::<usize>()
                    .ok()
                    .filter(|&c| c > 0)
                    .ok_or_else(|| format!("Invalid column count: {cols}"))?;
            }
            if let Some(base) = get_flag_value(args, "--base") {
                options.base_display_addr =
                    parse_hex_str(&base).map_err(|_e| format!("Invalid base address: {base}"))?;
            }

            let offset = if let Some(offset) = get_flag_value(args, "--offset") {
                parse_hex_str(&offset).map_err(|_e| format!("Invalid offset: {offset}"))?
            } else {
                0
            };
            let rows = if let Some(rows) = get_flag_value(args, "--rows") {
                Some(
                    rows.parse::<usize>()
                        .map_err(|_e| format!("Invalid row count: {rows}"))?,
                )
            } else {
                None
            };

            run_dump(&abs_path, options, offset, rows)
        }
        _ => {
            print_usage();
            process::exit(1);
        }
    }
}

fn run_inspect(
    path: &PathBuf,
    offset: usize,
    ntype: Option<NumericType>,
    endianness: Endianness,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = std::fs::read(path)?;

    let types: Vec<NumericType> = ntype.map_or_else(|| NumericType::ALL.to_vec(), |t| vec![t]);

    println!("File Path:   {}", path.display());
    println!("Data Size:   {} bytes", format_with_separators(data.len()));
    println!("Offset:      0x{offset:X}");
    println!("Endianness:  {endianness:?}");
    println!();

    for t in types {
        let rendered = codec::preview(&data, offset, t, endianness)?;
        print_rendered(t, &rendered);
    }
    Ok(())
}

fn run_convert(
    value: &str,
    ntype: NumericType,
    format: NumericFormat,
    target: Option<NumericType>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut conv = Converter::new();
    conv.set_format(format);
    conv.set_type(ntype);

    // Guard: Report why the value was rejected
    if !conv.set_text(value) {
        codec::encode(value, ntype, format)?;
    }
    print_rendered(ntype, &conv.render());

    if let Some(target) = target {
        conv.set_type(target);
        println!();
        print_rendered(target, &conv.render());
    }
    Ok(())
}

fn run_dump(
    path: &PathBuf,
    options: EditorOptions,
    offset: usize,
    rows: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = std::fs::read(path)?;

    // Guard: Offset must be inside the file
    if offset >= data.len() {
        return Err(format!(
            "Offset 0x{offset:X} is outside of the file (size: {} bytes)",
            data.len()
        )
        .into());
    }

    let editor = MemoryEditor::new(options);
    let layout = editor.layout();

    let first_row = layout.position(offset).row;
    let last_row = rows.map_or_else(
        || layout.row_count(data.len()),
        |n| (first_row + n).min(layout.row_count(data.len())),
    );

    for row in first_row..last_row {
        if let Some(line) = editor.format_row(&data, row) {
            println!("{line}");
        }
    }
    Ok(())
}

// =============================== HELPER FUNCTIONS ===============================

fn print_rendered(ntype: NumericType, rendered: &Rendered) {
    let decimal = if ntype.is_float() {
        rendered.decimal.clone()
    } else {
        format_with_separators(&rendered.decimal)
    };

    println!("{:<10}  Dec: {decimal}", ntype.name());
    println!("{:<10}  Hex: {}", "", rendered.hex);
    println!("{:<10}  Bin: {}", "", rendered.binary.trim_end());
}

/// Format the number with thousands separators, e.g. -1,234,567
fn format_with_separators<T: ToString>(n: T) -> String {
    let s = n.to_string();
    let mut result = String::new();

    // Consider negative sign in front of digits
    let (sign, digits) = s
        .strip_prefix('-')
        .map_or(("", s.as_str()), |stripped| ("-", stripped));

    for (idx, ch) in digits.chars().rev().enumerate() {
        if idx != 0 && idx % 3 == 0 {
            result.insert(0, ',');
        }
        result.insert(0, ch);
    }
    format!("{sign}{result}")
}

/// Parse a string as a hex number (with optional 0x prefix)
fn parse_hex_str(s: &str) -> Result<usize, std::num::ParseIntError> {
    let s = s.trim();

    // Handle explicit 0x prefix
    if let Some(hex_str) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        return usize::from_str_radix(hex_str, 16);
    }

    // Parse as hex without prefix
    usize::from_str_radix(s, 16)
}

/// Validate that a path exists and is a file. Returns absolute path.
fn validate_exists(path_str: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let path = PathBuf::from(path_str);
    if !path.exists() {
        return Err(format!("File not found: {path_str}").into());
    }
    if !path.is_file() {
        return Err(format!("Path is not a file: {path_str}").into());
    }
    // Return absolute path
    Ok(std::fs::canonicalize(path)?)
}

/// Find the value after a specific flag (e.g., "--type i32")
fn get_flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|pos| args.get(pos + 1))
        .cloned()
}
