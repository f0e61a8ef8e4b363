#[cfg(test)]
mod tests {
    use rand::rngs::mock::StepRng;
    use static_carrier_core::noise::NoiseSource;

    #[test]
    fn pixels_are_binary_and_balanced() {
        let mut n = NoiseSource::seeded(3);
        let mut px = vec![1u8; 10_000];
        n.fill(&mut px);
        assert!(px.iter().all(|&p| p == 0 || p == 255));
        let white = px.iter().filter(|&&p| p == 255).count();
        assert!((4_000..6_000).contains(&white), "{white} white pixels");
    }

    #[test]
    fn same_seed_same_noise() {
        let (mut a, mut b) = (NoiseSource::seeded(8), NoiseSource::seeded(8));
        let (mut x, mut y) = (vec![0u8; 333], vec![0u8; 333]);
        a.fill(&mut x);
        b.fill(&mut y);
        assert_eq!(x, y);
    }

    #[test]
    fn bits_map_msb_first() {
        // StepRng yields 0xFF for every byte of u64::MAX
        let mut n = NoiseSource::new(StepRng::new(u64::MAX, 0));
        let mut px = [0u8; 12];
        n.fill(&mut px);
        assert_eq!(px, [255; 12]);

        let mut zero = NoiseSource::new(StepRng::new(0, 0));
        zero.fill(&mut px);
        assert_eq!(px, [0; 12]);
    }
}
