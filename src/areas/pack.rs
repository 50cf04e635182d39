//! Packed objects
//!
//! `git gc`, `git clone` and automatic repacking move objects out of the loose
//! store into `objects/pack/pack-<sha>.pack`, each with a `.idx` next to it.
//!
//! ## Index (version 2)
//!
//! ```text
//! Header (8 bytes):
//!   - Magic: "\377tOc" (4 bytes)
//!   - Version: 2 (4 bytes)
//!
//! Fanout (256 x 4 bytes):
//!   - Entry i: number of objects whose first id byte is <= i
//!
//! Tables, N = fanout[255]:
//!   - N object ids, 20 bytes each, sorted
//!   - N CRC32 checksums (4 bytes)
//!   - N pack offsets (4 bytes); MSB set means "index into the large table"
//!   - large offsets (8 bytes each)
//! ```
//!
//! ## Pack entries
//!
//! Each entry starts with a variable-length header holding its kind and
//! inflated size, followed by a zlib stream. Delta entries (`OFS_DELTA`,
//! `REF_DELTA`) name a base object first and inflate to a list of copy/insert
//! instructions to apply to that base.

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use byteorder::{ByteOrder, NetworkEndian, ReadBytesExt};
use bytes::Bytes;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Magic bytes opening a version 2 pack index
pub const INDEX_SIGNATURE: [u8; 4] = [0xff, b't', b'O', b'c'];

/// Magic bytes opening a packfile
pub const PACK_SIGNATURE: [u8; 4] = *b"PACK";

/// Size of a raw object id
pub const RAW_ID_SIZE: usize = 20;

const FANOUT_START: usize = 8;
const IDS_START: usize = FANOUT_START + 256 * 4;
const LARGE_OFFSET_FLAG: u32 = 0x8000_0000;

/// Longest delta chain followed before the pack is considered corrupt
const MAX_DELTA_CHAIN: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
enum EntryKind {
    Base(ObjectType),
    OfsDelta,
    RefDelta,
}

impl TryFrom<u8> for EntryKind {
    type Error = anyhow::Error;

    fn try_from(kind: u8) -> anyhow::Result<Self> {
        match kind {
            1 => Ok(EntryKind::Base(ObjectType::Commit)),
            2 => Ok(EntryKind::Base(ObjectType::Tree)),
            3 => Ok(EntryKind::Base(ObjectType::Blob)),
            4 => Ok(EntryKind::Base(ObjectType::Tag)),
            6 => Ok(EntryKind::OfsDelta),
            7 => Ok(EntryKind::RefDelta),
            _ => Err(anyhow::anyhow!("invalid pack entry type: {kind}")),
        }
    }
}

/// Parsed `.idx` file, kept as raw bytes and searched in place
#[derive(Debug)]
pub struct PackIndex {
    content: Bytes,
    count: usize,
}

impl PackIndex {
    pub fn parse(content: Bytes) -> anyhow::Result<Self> {
        if content.len() < IDS_START || content[0..4] != INDEX_SIGNATURE {
            anyhow::bail!("unsupported pack index: missing version 2 signature");
        }

        let version = NetworkEndian::read_u32(&content[4..8]);
        if version != 2 {
            anyhow::bail!("unsupported pack index version {version}");
        }

        let count = NetworkEndian::read_u32(&content[IDS_START - 4..IDS_START]) as usize;
        if content.len() < IDS_START + count * (RAW_ID_SIZE + 4 + 4) {
            anyhow::bail!("truncated pack index: {count} objects announced");
        }

        Ok(Self { content, count })
    }

    fn len(&self) -> usize {
        self.count
    }

    /// Offset of `id` in the pack, if the pack holds it
    pub fn offset_of(&self, id: &[u8; RAW_ID_SIZE]) -> anyhow::Result<Option<u64>> {
        let first = usize::from(id[0]);
        let mut low = if first == 0 { 0 } else { self.fanout(first - 1) };
        let mut high = self.fanout(first).min(self.count);

        while low < high {
            let middle = low + (high - low) / 2;
            match self.id_at(middle).cmp(id.as_slice()) {
                std::cmp::Ordering::Less => low = middle + 1,
                std::cmp::Ordering::Greater => high = middle,
                std::cmp::Ordering::Equal => return self.offset_at(middle).map(Some),
            }
        }

        Ok(None)
    }

    fn fanout(&self, index: usize) -> usize {
        let start = FANOUT_START + index * 4;
        NetworkEndian::read_u32(&self.content[start..start + 4]) as usize
    }

    fn id_at(&self, index: usize) -> &[u8] {
        let start = IDS_START + index * RAW_ID_SIZE;
        &self.content[start..start + RAW_ID_SIZE]
    }

    fn offset_at(&self, index: usize) -> anyhow::Result<u64> {
        let offsets_start = IDS_START + self.count * (RAW_ID_SIZE + 4);
        let start = offsets_start + index * 4;
        let offset = NetworkEndian::read_u32(&self.content[start..start + 4]);

        if offset & LARGE_OFFSET_FLAG == 0 {
            return Ok(u64::from(offset));
        }

        let large_start = offsets_start + self.count * 4;
        let start = large_start + (offset & !LARGE_OFFSET_FLAG) as usize * 8;
        let large = self
            .content
            .get(start..start + 8)
            .context("pack index large offset out of range")?;

        Ok(NetworkEndian::read_u64(large))
    }
}

/// One `.pack` file and its index
#[derive(Debug)]
pub struct Pack {
    index_path: PathBuf,
    pack_path: PathBuf,
    index: PackIndex,
}

impl Pack {
    /// Load the index at `index_path`; the pack itself is opened per read
    pub fn open(index_path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read(index_path)
            .with_context(|| format!("Unable to read pack index {}", index_path.display()))?;
        let index = PackIndex::parse(content.into())
            .with_context(|| format!("Invalid pack index {}", index_path.display()))?;

        Ok(Self {
            index_path: index_path.to_path_buf(),
            pack_path: index_path.with_extension("pack"),
            index,
        })
    }

    /// Inflate the object `id` with its deltas applied
    ///
    /// Returns `Ok(None)` when this pack does not hold `id`.
    pub fn read(&self, id: &[u8; RAW_ID_SIZE]) -> anyhow::Result<Option<(ObjectType, Vec<u8>)>> {
        let Some(offset) = self.index.offset_of(id)? else {
            return Ok(None);
        };

        let file = File::open(&self.pack_path)
            .with_context(|| format!("Unable to open pack {}", self.pack_path.display()))?;
        let mut reader = BufReader::new(file);

        let mut signature = [0; 4];
        reader.read_exact(&mut signature)?;
        if signature != PACK_SIGNATURE {
            anyhow::bail!("{} is not a packfile", self.pack_path.display());
        }

        self.read_at(&mut reader, offset)
            .with_context(|| {
                format!(
                    "Unable to read object at offset {offset} of {}",
                    self.pack_path.display()
                )
            })
            .map(Some)
    }

    fn read_at(
        &self,
        reader: &mut BufReader<File>,
        offset: u64,
    ) -> anyhow::Result<(ObjectType, Vec<u8>)> {
        let mut deltas = Vec::new();
        let mut offset = offset;

        let (object_type, mut content) = loop {
            if deltas.len() > MAX_DELTA_CHAIN {
                anyhow::bail!("delta chain longer than {MAX_DELTA_CHAIN}");
            }

            reader.seek(SeekFrom::Start(offset))?;
            let (kind, size) = read_entry_header(reader)?;

            match kind {
                EntryKind::Base(object_type) => break (object_type, inflate(reader, size)?),
                EntryKind::OfsDelta => {
                    let distance = read_base_distance(reader)?;
                    deltas.push(inflate(reader, size)?);
                    offset = offset
                        .checked_sub(distance)
                        .context("delta base lies before the start of the pack")?;
                }
                EntryKind::RefDelta => {
                    let mut base = [0; RAW_ID_SIZE];
                    reader.read_exact(&mut base)?;
                    deltas.push(inflate(reader, size)?);
                    offset = self
                        .index
                        .offset_of(&base)?
                        .context("delta base is missing from the pack")?;
                }
            }
        };

        for delta in deltas.iter().rev() {
            content = apply_delta(&content, delta)?;
        }

        Ok((object_type, content))
    }
}

/// Every pack under `objects/pack`
///
/// Indexes are loaded the first time an object is missing from all of the
/// known packs, so packs written while the server runs are picked up.
#[derive(Debug, Default)]
pub struct Packs {
    loaded: RwLock<Vec<Arc<Pack>>>,
}

impl Packs {
    /// Read `object_id` from whichever pack in `pack_dir` holds it
    pub fn read(
        &self,
        pack_dir: &Path,
        object_id: &ObjectId,
    ) -> anyhow::Result<Option<(ObjectType, Vec<u8>)>> {
        let id = object_id.to_raw()?;

        if let Some(pack) = self.find(&id)? {
            match pack.read(&id) {
                Ok(object) => return Ok(object),
                // e.g. removed by a repack since it was loaded
                Err(err) => tracing::debug!(error = %format!("{err:#}"), "rescanning packs"),
            }
        }

        self.refresh(pack_dir)?;

        match self.find(&id)? {
            Some(pack) => pack.read(&id),
            None => Ok(None),
        }
    }

    fn find(&self, id: &[u8; RAW_ID_SIZE]) -> anyhow::Result<Option<Arc<Pack>>> {
        let loaded = self
            .loaded
            .read()
            .map_err(|_| anyhow::anyhow!("pack list lock poisoned"))?;

        for pack in loaded.iter() {
            if pack.index.offset_of(id)?.is_some() {
                return Ok(Some(Arc::clone(pack)));
            }
        }

        Ok(None)
    }

    fn refresh(&self, pack_dir: &Path) -> anyhow::Result<()> {
        let entries = match std::fs::read_dir(pack_dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Unable to list {}", pack_dir.display()));
            }
        };

        let mut loaded = self
            .loaded
            .write()
            .map_err(|_| anyhow::anyhow!("pack list lock poisoned"))?;
        loaded.retain(|pack| pack.index_path.is_file() && pack.pack_path.is_file());

        for entry in entries {
            let index_path = entry?.path();
            let is_index = index_path.extension().is_some_and(|ext| ext == "idx");

            // a pack still being written has no `.pack` yet
            if !is_index
                || !index_path.with_extension("pack").is_file()
                || loaded.iter().any(|pack| pack.index_path == index_path)
            {
                continue;
            }

            let pack = Pack::open(&index_path)?;
            tracing::debug!(
                index = %index_path.display(),
                objects = pack.index.len(),
                "pack index loaded"
            );
            loaded.push(Arc::new(pack));
        }

        Ok(())
    }
}

/// Kind and inflated size of the entry `reader` is positioned on
fn read_entry_header(reader: &mut impl Read) -> anyhow::Result<(EntryKind, u64)> {
    let mut byte = reader.read_u8()?;
    let kind = EntryKind::try_from((byte >> 4) & 0b111)?;

    let mut size = u64::from(byte & 0x0f);
    let mut shift = 4;
    while byte & 0x80 != 0 {
        if shift > 57 {
            anyhow::bail!("pack entry size overflows");
        }
        byte = reader.read_u8()?;
        size |= u64::from(byte & 0x7f) << shift;
        shift += 7;
    }

    Ok((kind, size))
}

/// Distance back from an `OFS_DELTA` entry to its base
fn read_base_distance(reader: &mut impl Read) -> anyhow::Result<u64> {
    let mut byte = reader.read_u8()?;
    let mut distance = u64::from(byte & 0x7f);

    while byte & 0x80 != 0 {
        byte = reader.read_u8()?;
        distance = distance
            .checked_add(1)
            .and_then(|distance| distance.checked_mul(128))
            .context("delta base offset overflows")?
            | u64::from(byte & 0x7f);
    }

    Ok(distance)
}

/// Little-endian base-128 size used in delta headers
fn read_delta_size(reader: &mut impl Read) -> anyhow::Result<u64> {
    let mut size = 0;
    let mut shift = 0;

    loop {
        if shift > 63 {
            anyhow::bail!("delta size overflows");
        }
        let byte = reader.read_u8()?;
        size |= u64::from(byte & 0x7f) << shift;
        shift += 7;

        if byte & 0x80 == 0 {
            return Ok(size);
        }
    }
}

fn inflate(reader: &mut impl BufRead, size: u64) -> anyhow::Result<Vec<u8>> {
    let mut content = Vec::new();
    flate2::bufread::ZlibDecoder::new(reader)
        .take(size)
        .read_to_end(&mut content)
        .context("Unable to decompress packed object")?;

    if content.len() as u64 != size {
        anyhow::bail!("packed object inflates to {} bytes, expected {size}", content.len());
    }

    Ok(content)
}

/// Rebuild an object from its base and a delta
pub fn apply_delta(base: &[u8], delta: &[u8]) -> anyhow::Result<Vec<u8>> {
    let mut delta = delta;

    let base_size = read_delta_size(&mut delta)?;
    if base_size != base.len() as u64 {
        anyhow::bail!("delta expects a {base_size} byte base, got {}", base.len());
    }
    let target_size = read_delta_size(&mut delta)?;

    let mut target = Vec::new();
    while !delta.is_empty() {
        let command = delta.read_u8()?;

        if command & 0x80 != 0 {
            let mut offset = 0usize;
            for byte in 0..4 {
                if command & (1 << byte) != 0 {
                    offset |= usize::from(delta.read_u8()?) << (8 * byte);
                }
            }

            let mut size = 0usize;
            for byte in 0..3 {
                if command & (0x10 << byte) != 0 {
                    size |= usize::from(delta.read_u8()?) << (8 * byte);
                }
            }
            if size == 0 {
                size = 0x10000;
            }

            let chunk = offset
                .checked_add(size)
                .and_then(|end| base.get(offset..end))
                .context("delta copies past the end of its base")?;
            target.extend_from_slice(chunk);
        } else if command != 0 {
            let size = usize::from(command);
            if delta.len() < size {
                anyhow::bail!("delta inserts past its own end");
            }
            let (chunk, rest) = delta.split_at(size);
            target.extend_from_slice(chunk);
            delta = rest;
        } else {
            anyhow::bail!("invalid delta instruction 0");
        }
    }

    if target.len() as u64 != target_size {
        anyhow::bail!("delta produced {} bytes, expected {target_size}", target.len());
    }

    Ok(target)
}
