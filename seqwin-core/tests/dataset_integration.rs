use rand::rngs::StdRng;
use rand::SeedableRng;
use seqwin_core::codec::{encode_indices, UNKNOWN_INDEX, UNKNOWN_ONE_HOT};
use seqwin_core::store::write_fai;
use seqwin_core::{
    open_store, ColumnType, DatasetBuilder, DatasetError, EncodedSequence, EncodingMode,
    EncodingPolicy, FastaInterval, FieldValue, SchemaOverrides, SequenceStore,
};
use std::collections::HashMap;
use std::io::Write;
use tempfile::NamedTempFile;

fn chromosome(length: usize, seed: u8) -> Vec<u8> {
    (0..length)
        .map(|i| b"ACGT"[(i * 7 + seed as usize + i / 13) % 4])
        .collect()
}

fn write_fasta(records: &[(&str, &[u8])], line_width: usize) -> NamedTempFile {
    let mut f = NamedTempFile::new().expect("create temp fasta");
    for (name, sequence) in records {
        writeln!(f, ">{} test sequence", name).unwrap();
        for line in sequence.chunks(line_width) {
            f.write_all(line).unwrap();
            writeln!(f).unwrap();
        }
    }
    f.flush().unwrap();
    f
}

fn write_bed(lines: &[&str]) -> NamedTempFile {
    let mut f = NamedTempFile::new().expect("create temp bed");
    for l in lines {
        writeln!(f, "{}", l).unwrap();
    }
    f.flush().unwrap();
    f
}

#[test]
fn indexed_fasta_dataset_end_to_end() {
    let chr1 = chromosome(600, 0);
    let chr2 = chromosome(90, 1);
    let fasta = write_fasta(&[("chr1", &chr1), ("chr2", &chr2)], 60);
    let bed = write_bed(&[
        "# peaks",
        "1\t100\t150\tpeak_a\t12.5",
        "1\t0\t50\tpeak_b\t3",
        "chr2\t10\t40\tpeak_c\t.",
        "chrUn\t10\t40\tpeak_d\t1",
        "1\t550\t700\tpeak_e\t2",
    ]);

    let mut name_map = HashMap::new();
    name_map.insert("1".to_string(), "chr1".to_string());

    let dataset = DatasetBuilder::new()
        .bed_file(bed.path())
        .name_map(name_map)
        .policy(
            EncodingPolicy::new()
                .with_context_length(64)
                .with_encoding(EncodingMode::Index),
        )
        .open(fasta.path())
        .expect("build dataset");

    // peak_b starts at 0 and chrUn is not in the FASTA. peak_e runs past the end
    // of chr1 but is shorter than it, so it stays.
    assert_eq!(dataset.len(), 3);
    assert_eq!(dataset.row(0).unwrap().extra[0], FieldValue::Str("peak_a".into()));
    assert_eq!(dataset.row(1).unwrap().extra[1], FieldValue::Null);

    let mut rng = StdRng::seed_from_u64(17);

    // [100, 150) grows by 7 left and 7 right to 64 bases
    let first = dataset.get(0, &mut rng).unwrap();
    assert_eq!(
        first.encoded,
        EncodedSequence::Indices(encode_indices(&chr1[93..157]))
    );
    assert!(first.augmentation.is_none());

    // [550, 700) shrinks to [593, 657) and is padded past the end of chr1
    let last = dataset.get(2, &mut rng).unwrap();
    let indices = last.encoded.as_indices().unwrap();
    assert_eq!(indices.len(), 64);
    assert_eq!(&indices[..7], encode_indices(&chr1[593..600]).as_slice());
    assert!(indices[7..].iter().all(|&i| i == UNKNOWN_INDEX));

    assert!(matches!(
        dataset.get(3, &mut rng),
        Err(DatasetError::IndexOutOfBounds { index: 3, len: 3 })
    ));
}

#[test]
fn schema_overrides_pin_extra_columns() {
    let fasta = write_fasta(&[("chr1", &chromosome(200, 2))], 50);
    let bed = write_bed(&["chr1\t10\t20\t007\t5", "chr1\t30\t40\t008\t6"]);

    let mut overrides = SchemaOverrides::new();
    overrides.insert(3, ColumnType::Str);
    overrides.insert(4, ColumnType::Float);

    let dataset = DatasetBuilder::new()
        .bed_file(bed.path())
        .schema_overrides(overrides)
        .open(fasta.path())
        .unwrap();

    assert_eq!(
        dataset.row(1).unwrap().extra,
        vec![FieldValue::Str("008".into()), FieldValue::Float(6.0)]
    );
}

#[test]
fn persisted_index_is_reused() {
    let chr1 = chromosome(300, 3);
    let fasta = write_fasta(&[("chr1", &chr1)], 70);
    let fai = write_fai(fasta.path(), false).expect("write index");
    assert!(fai.exists());

    let resolver = FastaInterval::open(
        fasta.path(),
        EncodingPolicy::new().with_context_length(20),
    )
    .unwrap();
    assert_eq!(resolver.store().length("chr1").unwrap(), 300);

    let mut rng = StdRng::seed_from_u64(0);
    let resolved = resolver.resolve(&mut rng, "chr1", -15, 5, false).unwrap();
    let one_hot = resolved.encoded.as_one_hot().unwrap();
    assert_eq!(one_hot.len(), 20);
    assert!(one_hot[..15].iter().all(|v| *v == UNKNOWN_ONE_HOT));

    std::fs::remove_file(fai).unwrap();
}

#[test]
fn gzip_store_matches_indexed_store() {
    use flate2::write::GzEncoder;
    use flate2::Compression;

    let chr1 = chromosome(250, 4);
    let plain = write_fasta(&[("chr1", &chr1)], 60);

    let gz_path = plain.path().with_extension("fa.gz");
    let mut encoder = GzEncoder::new(std::fs::File::create(&gz_path).unwrap(), Compression::default());
    encoder
        .write_all(&std::fs::read(plain.path()).unwrap())
        .unwrap();
    encoder.finish().unwrap();

    let indexed = open_store(plain.path()).unwrap();
    let memory = open_store(&gz_path).unwrap();
    assert_eq!(indexed.names(), memory.names());
    assert_eq!(
        indexed.fetch("chr1", 17, 203).unwrap(),
        memory.fetch("chr1", 17, 203).unwrap()
    );

    std::fs::remove_file(gz_path).unwrap();
    let _ = std::fs::remove_file(format!("{}.fai", plain.path().display()));
}
