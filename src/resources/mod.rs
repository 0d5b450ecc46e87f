use std::{
    fs,
    io::{prelude::*, Cursor},
    path::Path,
};
use zip::{read::ZipArchive, result::ZipError};

use crate::{definitions::cpu, RomError};

/// Represents an archive of roms, every file inside of the archive is a
/// single rom named after the file.
pub struct RomArchive {
    archive: ZipArchive<Cursor<Vec<u8>>>,
}

impl RomArchive {
    /// Will open the given zip archive.
    pub fn new(data: Vec<u8>) -> Result<Self, RomError> {
        let archive = ZipArchive::new(Cursor::new(data))?;
        Ok(RomArchive { archive })
    }

    /// Will open the zip archive located at the path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, RomError> {
        Self::new(fs::read(path)?)
    }

    /// Will return all the rom names available to be chosen
    pub fn file_names(&self) -> Vec<&str> {
        self.archive.file_names().collect()
    }

    /// Will decompress the rom from the zip archive
    pub fn get_file_data(&mut self, name: &str) -> Result<Rom, RomError> {
        let file = match self.archive.by_name(name) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => return Err(RomError::NotFound(name.to_string())),
            Err(err) => return Err(err.into()),
        };
        // anything larger then the program area is rejected when loading
        let mut data = Vec::new();
        file.take(cpu::PROGRAM_SIZE as u64 + 1)
            .read_to_end(&mut data)?;
        log::debug!("extracted rom {} with {} bytes", name, data.len());
        Ok(Rom::new(name, data.into_boxed_slice()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Represents a single rom with it's information
pub struct Rom {
    /// The rom name
    name: String,
    /// The raw program, as it is loaded at the program start
    data: Box<[u8]>,
}

impl Rom {
    fn new(name: &str, data: Box<[u8]>) -> Self {
        Rom {
            name: name.to_string(),
            data,
        }
    }

    /// Will generate a new rom based of the given data
    pub fn from_bytes(name: &str, data: &[u8]) -> Self {
        Self::new(name, data.into())
    }

    /// Will read the rom from the file system, the file name becomes the rom name.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, RomError> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(&name, data.into_boxed_slice()))
    }

    /// Will return a slice internal values of the given data
    pub fn get_data(&self) -> &[u8] {
        &self.data
    }

    /// Will return the name of the rom.
    pub fn get_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::{Rom, RomArchive};
    use crate::{
        definitions::cpu,
        opcode::{build_opcode, Opcode},
        RomError,
    };
    use std::io::{Cursor, Write};
    use zip::{write::FileOptions, ZipWriter};

    const RAW_ROM_DATA: [Opcode; 12] = [
        0x00E0, 0x6C00, 0x4C00, 0x6E0F, 0xA203, 0x6020, 0xF055, 0x00E0, 0x22BE, 0x2276, 0x228E,
        0x1210,
    ];

    const ROM_NAMES: [&str; 3] = ["BLINKY", "MAZE", "PONG"];

    fn rom_bytes() -> Vec<u8> {
        RAW_ROM_DATA.iter().flat_map(|op| op.to_be_bytes()).collect()
    }

    fn build_archive() -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for name in ROM_NAMES.iter().rev() {
            writer.start_file(*name, FileOptions::default()).unwrap();
            writer.write_all(&rom_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_rom_extract() {
        let mut ra = RomArchive::new(build_archive()).unwrap();
        let rom = ra.get_file_data(ROM_NAMES[0]).unwrap();
        let data = rom.get_data();

        assert_eq!(rom.get_name(), ROM_NAMES[0]);
        assert_eq!(data.len(), RAW_ROM_DATA.len() * 2);
        for i in (0..data.len()).step_by(2) {
            let opcode = build_opcode(data, i).unwrap();
            assert_eq!(RAW_ROM_DATA[i / 2], opcode);
        }
    }

    #[test]
    fn test_file_names() {
        let ra = RomArchive::new(build_archive()).unwrap();
        let mut files = ra.file_names();
        files.sort_unstable();

        assert_eq!(&ROM_NAMES, &files[..]);
    }

    #[test]
    fn test_missing_rom() {
        let mut ra = RomArchive::new(build_archive()).unwrap();
        assert_eq!(
            ra.get_file_data("TETRIS"),
            Err(RomError::NotFound("TETRIS".to_string()))
        );
    }

    #[test]
    fn test_invalid_archive() {
        let res = RomArchive::new(vec![0x12, 0x34, 0x56]);
        assert!(matches!(res, Err(RomError::Archive(_))));
    }

    #[test]
    fn test_rom_from_path() {
        let path = std::env::temp_dir().join(format!("chip8vm-rom-{}", std::process::id()));
        std::fs::write(&path, rom_bytes()).unwrap();

        let rom = Rom::from_path(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(rom, Rom::from_bytes(rom.get_name(), &rom_bytes()));
        assert!(rom.get_name().starts_with("chip8vm-rom-"));
    }

    #[test]
    fn test_archive_from_path() {
        let path = std::env::temp_dir().join(format!("chip8vm-archive-{}", std::process::id()));
        std::fs::write(&path, build_archive()).unwrap();

        let ra = RomArchive::from_path(&path);
        std::fs::remove_file(&path).unwrap();

        let mut ra = ra.unwrap();
        let mut files = ra.file_names();
        files.sort_unstable();
        assert_eq!(&ROM_NAMES, &files[..]);
        assert_eq!(ra.get_file_data("PONG").unwrap().get_data(), &rom_bytes()[..]);
    }

    #[test]
    /// the extraction stops right after the program area is exceeded
    fn test_oversized_rom_is_capped() {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer.start_file("HUGE", FileOptions::default()).unwrap();
        writer.write_all(&[0xAB; 0x4000]).unwrap();
        let archive = writer.finish().unwrap().into_inner();

        let mut ra = RomArchive::new(archive).unwrap();
        let rom = ra.get_file_data("HUGE").unwrap();
        assert_eq!(rom.get_data().len(), cpu::PROGRAM_SIZE + 1);
    }

    #[test]
    fn test_rom_missing_file() {
        let res = Rom::from_path("/this/rom/does/not/exist");
        assert!(matches!(res, Err(RomError::Io(_))));
    }
}
