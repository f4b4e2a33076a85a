use dotenv::dotenv;
use std::env;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;
use toml::Value;

const SECRET_KEY_LEN: usize = 32;
const SECRET_IV_LEN: usize = 16;

struct AppMetadata {
    file: File,
}

impl AppMetadata {
    pub fn new() -> io::Result<Self> {
        let out_dir = env::var("OUT_DIR").map_err(|e| io::Error::new(io::ErrorKind::NotFound, e))?;
        let dest_path = Path::new(&out_dir).join("app_metadata.rs");
        let file = File::create(&dest_path)?;
        Ok(Self { file })
    }

    pub fn write(&mut self, key: &str, value: &str) -> io::Result<()> {
        write!(
            self.file,
            "#[allow(unused)]\npub const APP_METADATA_{}: &str = {:?};\n",
            key.to_uppercase(),
            value
        )
    }

    pub fn write_bytes(&mut self, key: &str, value: &[u8]) -> io::Result<()> {
        write!(
            self.file,
            "#[allow(unused)]\npub const APP_METADATA_{}: &[u8; {}] = &[",
            key.to_uppercase(),
            value.len()
        )?;

        for (i, byte) in value.iter().enumerate() {
            if i > 0 {
                write!(self.file, ", ")?;
            }
            write!(self.file, "{}", byte)?;
        }

        writeln!(self.file, "];")
    }
}

/// Pads or truncates `seed` to exactly `len` bytes.
fn fixed_len(seed: String, len: usize) -> Vec<u8> {
    let mut bytes = seed.into_bytes();
    bytes.truncate(len);
    bytes.resize(len, b'!');
    bytes
}

fn main() -> io::Result<()> {
    println!("cargo:rerun-if-changed=Cargo.toml");
    println!("cargo:rerun-if-env-changed=PLANTY_SECRET_KEY");
    println!("cargo:rerun-if-env-changed=PLANTY_SECRET_IV");

    // Load .env file if it exists
    let _ = dotenv();

    let cargo_toml = fs::read_to_string("Cargo.toml")?;
    let cargo_toml: Value = toml::from_str(&cargo_toml).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    let package_name = env::var("CARGO_PKG_NAME").unwrap_or_else(|_| "planty".to_string());
    let mut app_metadata = AppMetadata::new()?;
    app_metadata.write("NAME", &package_name)?;
    app_metadata.write("VERSION", &env::var("CARGO_PKG_VERSION").unwrap_or_default())?;

    if let Some(metadata) = cargo_toml.get("package").and_then(|pkg| pkg.get("metadata")).and_then(|meta| meta.as_table()) {
        for (key, value) in metadata {
            if let Some(value) = value.as_str() {
                app_metadata.write(key, value)?;
            }
        }
    }

    // Keys for the local password cache, never for attachments
    let (secret_key, secret_iv) = match (env::var("PLANTY_SECRET_KEY"), env::var("PLANTY_SECRET_IV")) {
        (Ok(key), Ok(iv)) => {
            if key.len() != SECRET_KEY_LEN {
                panic!("PLANTY_SECRET_KEY must be exactly {} bytes long, got {} bytes", SECRET_KEY_LEN, key.len());
            }
            if iv.len() != SECRET_IV_LEN {
                panic!("PLANTY_SECRET_IV must be exactly {} bytes long, got {} bytes", SECRET_IV_LEN, iv.len());
            }
            (key.into_bytes(), iv.into_bytes())
        }
        _ => {
            println!("cargo:warning=PLANTY_SECRET_KEY or PLANTY_SECRET_IV not found in environment.");
            println!("cargo:warning=Using default keys. For production, create a .env file with both values.");
            (
                fixed_len(format!("{}_default_secret_key", package_name), SECRET_KEY_LEN),
                fixed_len(format!("{}_iv", package_name), SECRET_IV_LEN),
            )
        }
    };

    app_metadata.write_bytes("SECRET_KEY", &secret_key)?;
    app_metadata.write_bytes("SECRET_IV", &secret_iv)?;

    Ok(())
}
