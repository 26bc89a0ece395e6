use crate::errors::CoreError;

use super::encryption::{KdfParams, Sealed, NONCE_LEN, SALT_LEN};

/// Magic bytes identifying a SmartFinance backup.
pub const MAGIC: &[u8; 4] = b"SFBK";

/// Current backup format version.
pub const CURRENT_VERSION: u16 = 1;

/// magic(4) + version(2) + kdf params(12) + salt(16) + nonce(12) + ciphertext_len(8)
pub const HEADER_LEN: usize = 4 + 2 + 12 + SALT_LEN + NONCE_LEN + 8;

/// Parsed backup header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupHeader {
    pub version: u16,
    pub kdf_params: KdfParams,
}

/// Lay out a sealed payload as backup bytes.
///
/// ```text
/// [SFBK: 4B] [version: 2B LE] [memory_cost: 4B LE] [time_cost: 4B LE]
/// [parallelism: 4B LE] [salt: 16B] [nonce: 12B] [ciphertext_len: 8B LE]
/// [ciphertext]
/// ```
pub fn encode(kdf_params: &KdfParams, sealed: &Sealed) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_LEN + sealed.ciphertext.len());
    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&CURRENT_VERSION.to_le_bytes());
    buf.extend_from_slice(&kdf_params.memory_cost.to_le_bytes());
    buf.extend_from_slice(&kdf_params.time_cost.to_le_bytes());
    buf.extend_from_slice(&kdf_params.parallelism.to_le_bytes());
    buf.extend_from_slice(&sealed.salt);
    buf.extend_from_slice(&sealed.nonce);
    buf.extend_from_slice(&(sealed.ciphertext.len() as u64).to_le_bytes());
    buf.extend_from_slice(&sealed.ciphertext);
    buf
}

/// Parse backup bytes. KDF costs are range-checked before anything is
/// derived from them, so a crafted file cannot demand unbounded memory.
pub fn decode(data: &[u8]) -> Result<(BackupHeader, Sealed), CoreError> {
    if data.len() < HEADER_LEN {
        return Err(CoreError::InvalidFileFormat(
            "Backup too small to hold a header".into(),
        ));
    }
    let mut reader = Reader { data, pos: 0 };

    if reader.take::<4>()? != *MAGIC {
        return Err(CoreError::InvalidFileFormat(
            "Invalid magic bytes — not a SmartFinance backup".into(),
        ));
    }

    let version = u16::from_le_bytes(reader.take()?);
    if version == 0 || version > CURRENT_VERSION {
        return Err(CoreError::UnsupportedVersion(version));
    }

    let kdf_params = KdfParams {
        memory_cost: u32::from_le_bytes(reader.take()?),
        time_cost: u32::from_le_bytes(reader.take()?),
        parallelism: u32::from_le_bytes(reader.take()?),
    };
    check_range("memory_cost", kdf_params.memory_cost, 8, 1_048_576)?;
    check_range("time_cost", kdf_params.time_cost, 1, 20)?;
    check_range("parallelism", kdf_params.parallelism, 1, 16)?;

    let salt = reader.take::<SALT_LEN>()?;
    let nonce = reader.take::<NONCE_LEN>()?;
    let declared = u64::from_le_bytes(reader.take()?);

    let remaining = data.len() - reader.pos;
    let len = usize::try_from(declared)
        .ok()
        .filter(|len| *len <= remaining)
        .ok_or_else(|| {
            CoreError::InvalidFileFormat(format!(
                "Backup truncated: header declares {declared} bytes of ciphertext, {remaining} present"
            ))
        })?;

    let sealed = Sealed {
        salt,
        nonce,
        ciphertext: data[reader.pos..reader.pos + len].to_vec(),
    };
    Ok((BackupHeader { version, kdf_params }, sealed))
}

fn check_range(name: &str, value: u32, min: u32, max: u32) -> Result<(), CoreError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(CoreError::InvalidFileFormat(format!(
            "KDF {name} out of range: {value} (expected {min}..={max})"
        )))
    }
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl Reader<'_> {
    fn take<const N: usize>(&mut self) -> Result<[u8; N], CoreError> {
        let bytes: [u8; N] = self
            .data
            .get(self.pos..self.pos + N)
            .and_then(|slice| slice.try_into().ok())
            .ok_or_else(|| CoreError::InvalidFileFormat("Unexpected end of header".into()))?;
        self.pos += N;
        Ok(bytes)
    }
}
