#![allow(dead_code)]

use std::fs::{self, File};
use std::io::{Cursor, Read, Write};
use std::path::Path;
use std::rc::Rc;
use tempfile::TempDir;
use zip::{write::SimpleFileOptions, ZipWriter};
use zipdir_fs::{RealFs, Vfs};

pub const REAL_TXT: &[u8] = b"Test.\n";
pub const REAL2_TXT: &[u8] = b"asdf\n";
pub const PIPETESTDATA: &[u8] = b"Word1\nWord2\nWord3\n";

fn stored() -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored)
}

fn deflated() -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated)
}

pub fn testdata_zip() -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    zip.start_file("README", stored()).unwrap();
    zip.write_all(b"This is the readme.\n").unwrap();
    zip.start_file(".abstract", stored()).unwrap();
    zip.write_all(b"An abstract.\n").unwrap();
    zip.start_file("testfile.txt", deflated()).unwrap();
    zip.write_all(b"Test\n").unwrap();
    zip.start_file("pygopherd/pipetestdata", deflated()).unwrap();
    zip.write_all(PIPETESTDATA).unwrap();
    zip.start_file("pygopherd/pipetest.sh", stored()).unwrap();
    zip.write_all(b"#!/bin/sh\ncat\n").unwrap();
    zip.start_file("pygopherd/ziponly/deep.txt", stored()).unwrap();
    zip.write_all(b"deep\n").unwrap();

    zip.finish().unwrap().into_inner()
}

pub fn symlink_zip() -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    zip.start_file("real.txt", stored()).unwrap();
    zip.write_all(REAL_TXT).unwrap();
    zip.start_file("subdir2/real2.txt", stored()).unwrap();
    zip.write_all(REAL2_TXT).unwrap();

    zip.add_symlink("linked.txt", "real.txt", stored()).unwrap();
    zip.add_symlink("linktosubdir", "subdir", stored()).unwrap();
    zip.add_symlink("subdir/linked2.txt", "../subdir2/real2.txt", stored())
        .unwrap();
    zip.add_symlink("subdir/linkedabs.txt", "/real.txt", stored())
        .unwrap();
    zip.add_symlink("subdir/linkedrel.txt", "../real.txt", stored())
        .unwrap();
    zip.add_symlink("subdir/linktoself", ".", stored()).unwrap();
    zip.add_symlink("subdir/linktosubdir2", "../subdir2", stored())
        .unwrap();
    zip.add_symlink("loop1", "loop2", stored()).unwrap();
    zip.add_symlink("loop2", "loop1", stored()).unwrap();

    zip.finish().unwrap().into_inner()
}

pub fn nested_zip() -> Vec<u8> {
    let mut inner = ZipWriter::new(Cursor::new(Vec::new()));
    inner.start_file("file", stored()).unwrap();
    inner.write_all(b"from the inner archive\n").unwrap();
    let inner = inner.finish().unwrap().into_inner();

    let mut outer = ZipWriter::new(Cursor::new(Vec::new()));
    outer.start_file("inner.zip", stored()).unwrap();
    outer.write_all(&inner).unwrap();
    outer.start_file("outer.txt", stored()).unwrap();
    outer.write_all(b"from the outer archive\n").unwrap();
    outer.finish().unwrap().into_inner()
}

/// Document root with a plain file, a fake archive and three real ones.
pub fn document_root() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();

    fs::write(root.join("README"), b"top-level readme\n").unwrap();
    fs::write(root.join("fake.zip"), b"this is not an archive\n").unwrap();
    fs::create_dir(root.join("pub")).unwrap();
    write_file(&root.join("testdata.zip"), &testdata_zip());
    write_file(&root.join("symlinktest.zip"), &symlink_zip());
    write_file(&root.join("pub/a.zip"), &nested_zip());

    temp
}

fn write_file(path: &Path, data: &[u8]) {
    let mut file = File::create(path).unwrap();
    file.write_all(data).unwrap();
}

pub fn real_fs(temp: &TempDir) -> Rc<dyn Vfs> {
    Rc::new(RealFs::new(temp.path()))
}

pub fn read_all(vfs: &dyn Vfs, selector: &str) -> Vec<u8> {
    let mut data = Vec::new();
    vfs.open(selector).unwrap().read_to_end(&mut data).unwrap();
    data
}

pub fn sorted(mut names: Vec<String>) -> Vec<String> {
    names.sort();
    names
}
