use crate::error::{Error, Result};
use crate::member::ArchiveMember;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::io::{Read, Seek};
use zip::result::ZipError;
use zip::ZipArchive;

/// Container codec contract: enumerate members and decompress one on demand.
pub trait MemberSource {
    /// Every member stored in the archive, with its metadata.
    fn members(&mut self) -> Result<Vec<ArchiveMember>>;

    /// Decompress the payload of the member stored at `path`.
    fn read_member(&mut self, path: &str) -> Result<Vec<u8>>;
}

/// [`MemberSource`] backed by a ZIP archive.
#[derive(Debug)]
pub struct ZipSource<R> {
    archive: ZipArchive<R>,
}

impl<R: Read + Seek> ZipSource<R> {
    /// Read the central directory from `reader`.
    pub fn new(reader: R) -> Result<Self> {
        Ok(Self {
            archive: ZipArchive::new(reader)?,
        })
    }

    /// Number of members in the archive.
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archive.is_empty()
    }
}

impl<R: Read + Seek> MemberSource for ZipSource<R> {
    fn members(&mut self) -> Result<Vec<ArchiveMember>> {
        let mut members = Vec::with_capacity(self.archive.len());

        for i in 0..self.archive.len() {
            let file = self.archive.by_index_raw(i)?;
            members.push(ArchiveMember {
                path: file.name().to_string(),
                size: file.size(),
                modified: member_timestamp(file.last_modified()),
                mode: file.unix_mode(),
            });
        }

        Ok(members)
    }

    fn read_member(&mut self, path: &str) -> Result<Vec<u8>> {
        let mut file = match self.archive.by_name(path) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => return Err(Error::MemberNotFound(path.to_string())),
            Err(e) => return Err(e.into()),
        };

        // The declared size is untrusted until the CRC has been checked.
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer)?;
        Ok(buffer)
    }
}

/// Convert a ZIP DOS timestamp to UTC; missing or invalid stamps become the epoch.
fn member_timestamp(stamp: Option<zip::DateTime>) -> DateTime<Utc> {
    stamp
        .and_then(|dt| {
            NaiveDate::from_ymd_opt(dt.year().into(), dt.month().into(), dt.day().into())?
                .and_hms_opt(dt.hour().into(), dt.minute().into(), dt.second().into())
        })
        .map(|naive| Utc.from_utc_datetime(&naive))
        .unwrap_or_default()
}
