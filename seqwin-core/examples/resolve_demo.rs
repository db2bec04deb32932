//! SeqWin Resolver Demo
//!
//! Resolves a few intervals against a small in-memory genome and prints the
//! resulting windows with their augmentations.

use rand::rngs::StdRng;
use rand::SeedableRng;
use seqwin_core::codec::decode_indices;
use seqwin_core::{
    DatasetBuilder, EncodingMode, EncodingPolicy, FieldValue, IntervalRecord, MemoryStore,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("SeqWin Resolver Demo");
    println!("====================\n");

    let store = MemoryStore::from_records(vec![
        ("chr1", b"ACGTACGTTTGGCCAAACGTNNNNACGTACGGGTTTAACC".to_vec()),
        ("chr2", b"GGGGCCCCAAAATTTT".to_vec()),
    ]);

    let records = vec![
        IntervalRecord::new("chr1", 4, 12).with_extra(vec![FieldValue::Str("peak_1".into())]),
        IntervalRecord::new("chr1", 30, 38),
        IntervalRecord::new("chr2", 2, 6),
        // Dropped: start at 0
        IntervalRecord::new("chr2", 0, 4),
    ];

    let dataset = DatasetBuilder::new()
        .records(records)
        .policy(
            EncodingPolicy::new()
                .with_context_length(12)
                .with_shift_range(-2, 2)
                .with_reverse_complement(true)
                .with_encoding(EncodingMode::Index),
        )
        .return_augs(true)
        .build(store)?;

    let mut rng = StdRng::seed_from_u64(2024);
    for index in 0..dataset.len() {
        let window = dataset.window(index, &mut rng)?;
        let resolved = dataset.resolve_window(&window, &mut rng)?;
        let bases = resolved
            .encoded
            .as_indices()
            .map(decode_indices)
            .unwrap_or_default();
        let augmentation = resolved.augmentation.unwrap_or_default();

        println!(
            "{:<14} {}  shift {:+} rc {}",
            window.to_string(),
            bases,
            augmentation.shift,
            augmentation.reverse_complemented
        );
    }

    Ok(())
}
