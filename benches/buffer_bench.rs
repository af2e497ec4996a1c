use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use packetbuf::{identity_hash, PacketBuffer};

#[allow(clippy::unwrap_used)]
fn bench_field_encode_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("field_encode_decode");
    let payload_sizes = [64usize, 512, 4096];

    for &size in &payload_sizes {
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_function(format!("encode_{size}b"), |b| {
            b.iter_batched(
                PacketBuffer::new,
                |mut buf| {
                    buf.write_unsigned_byte(0x51).unwrap();
                    buf.write_short_be(size as i16).unwrap();
                    for _ in 0..size / 8 {
                        buf.write_long_be(0x0123_4567_89AB_CDEF).unwrap();
                    }
                    buf.written().len()
                },
                BatchSize::SmallInput,
            )
        });
        group.bench_function(format!("decode_{size}b"), |b| {
            let mut source = PacketBuffer::new();
            source.write_unsigned_byte(0x51).unwrap();
            source.write_short_be(size as i16).unwrap();
            for _ in 0..size / 8 {
                source.write_long_be(0x0123_4567_89AB_CDEF).unwrap();
            }
            let wire = source.written().to_vec();
            b.iter_batched(
                || PacketBuffer::wrap(wire.clone()),
                |mut buf| {
                    let opcode = buf.read_unsigned_byte().unwrap();
                    let len = buf.read_short_be().unwrap();
                    let mut sum = 0i64;
                    for _ in 0..size / 8 {
                        sum = sum.wrapping_add(buf.read_long_be().unwrap());
                    }
                    (opcode, len, sum)
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

#[allow(clippy::unwrap_used)]
fn bench_bit_packing(c: &mut Criterion) {
    let mut group = c.benchmark_group("bit_packing");
    group.bench_function("movement_update_64_entities", |b| {
        b.iter_batched(
            PacketBuffer::new,
            |mut buf| {
                buf.open_bit_channel().unwrap();
                for i in 0..64u32 {
                    buf.write_bits(1, 1).unwrap();
                    buf.write_bits(2, i & 3).unwrap();
                    buf.write_bits(3, i & 7).unwrap();
                    buf.write_bits(11, i * 17).unwrap();
                }
                buf.close_bit_channel().unwrap();
                buf.writer_index()
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_identity_hash(c: &mut Criterion) {
    let mut group = c.benchmark_group("identity_hash");
    for name in ["a", "mod", "player one", "zzzzzzzzzzzz"] {
        group.bench_function(format!("hash_{}", name.len()), |b| {
            b.iter(|| identity_hash(std::hint::black_box(name)))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_field_encode_decode,
    bench_bit_packing,
    bench_identity_hash
);
criterion_main!(benches);
