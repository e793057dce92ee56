use anyhow::Result;
use auto_augment::{
    catalogue::Catalogue,
    dispatch::apply_op,
    magnitude::SamplingParams,
    policy::{PolicyStep, SubPolicy},
    probability::Probability,
    processor::{
        AugMixInit, AutoAugmentInit, RandAugmentInit, TrivialAugmentWideInit, AUTO_AUGMENT_BINS,
    },
    Augment, AugmentConfig, Augmenter, AutoAugmentPolicy, Fill, Interpolation, Op, Sample,
};
use image::{DynamicImage, GenericImageView, Rgb, RgbImage, Rgba, RgbaImage};
use rand::prelude::*;
use std::convert::TryFrom;
use tch::{Device, Kind, Tensor};

#[derive(Debug, Clone, PartialEq)]
struct LabeledBox {
    class: usize,
    tlbr: [f64; 4],
}

fn all_augmenters() -> Result<Vec<Augmenter>> {
    let augmenters = vec![
        AugmentConfig::AutoAugment(AutoAugmentInit::default()).build()?,
        AugmentConfig::AutoAugment(AutoAugmentInit {
            policy: AutoAugmentPolicy::Svhn,
            ..Default::default()
        })
        .build()?,
        AugmentConfig::RandAugment(RandAugmentInit::default()).build()?,
        AugmentConfig::TrivialAugmentWide(TrivialAugmentWideInit::default()).build()?,
        AugmentConfig::AugMix(AugMixInit::default()).build()?,
    ];
    Ok(augmenters)
}

#[test]
fn preserve_shape_and_kind() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(1);
    let images = [
        Tensor::randint(256, &[3, 28, 36], (Kind::Uint8, Device::Cpu)),
        Tensor::randint(256, &[4, 3, 28, 36], (Kind::Uint8, Device::Cpu)),
        Tensor::rand(&[3, 28, 36], (Kind::Float, Device::Cpu)),
        Tensor::rand(&[1, 28, 36], (Kind::Float, Device::Cpu)),
    ];

    for augmenter in all_augmenters()? {
        for image in &images {
            for _ in 0..5 {
                let output = augmenter.forward(image, &mut rng)?;
                assert_eq!(output.size(), image.size(), "{}", augmenter.name());
                assert_eq!(output.kind(), image.kind(), "{}", augmenter.name());
            }
        }
    }
    Ok(())
}

#[test]
fn input_is_never_modified() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(2);
    let image = Tensor::randint(256, &[2, 3, 20, 20], (Kind::Uint8, Device::Cpu));
    let snapshot = image.copy();

    for augmenter in all_augmenters()? {
        for _ in 0..10 {
            augmenter.forward(&image, &mut rng)?;
        }
    }
    assert!(image.equal(&snapshot));
    Ok(())
}

#[test]
fn non_image_samples_pass_through() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(3);
    let record = LabeledBox {
        class: 7,
        tlbr: [0.1, 0.2, 0.5, 0.6],
    };

    for augmenter in all_augmenters()? {
        let output = augmenter.augment(Sample::Other(record.clone()), &mut rng)?;
        match output {
            Sample::Other(output) => assert_eq!(output, record),
            _ => panic!("a non-image sample turned into an image"),
        }
    }
    Ok(())
}

#[test]
fn raster_samples_round_trip() -> Result<()> {
    let mut raster = RgbImage::new(12, 10);
    raster.put_pixel(3, 4, Rgb([200, 100, 50]));
    let raster = DynamicImage::ImageRgb8(raster);

    let augment = RandAugmentInit {
        num_ops: 0,
        ..Default::default()
    }
    .build()?;
    let mut rng = StdRng::seed_from_u64(4);
    let output = augment.augment::<(), _>(Sample::Raster(raster.clone()), &mut rng)?;

    match output {
        Sample::Raster(output) => assert_eq!(output.to_rgb8(), raster.to_rgb8()),
        _ => panic!("expect a raster image"),
    }

    let augment = TrivialAugmentWideInit::default().build()?;
    let output = augment.augment::<(), _>(Sample::Raster(raster), &mut rng)?;
    match output {
        Sample::Raster(output) => {
            assert_eq!(output.width(), 12);
            assert_eq!(output.height(), 10);
        }
        _ => panic!("expect a raster image"),
    }
    Ok(())
}

#[test]
fn alpha_channel_is_kept() -> Result<()> {
    let mut raster = RgbaImage::new(16, 12);
    raster.enumerate_pixels_mut().for_each(|(x, y, pixel)| {
        *pixel = Rgba([(x * 15) as u8, (y * 20) as u8, 90, (x * 16 + y) as u8]);
    });
    let raster = DynamicImage::ImageRgba8(raster);
    let alpha = |image: &DynamicImage| {
        image
            .to_rgba8()
            .pixels()
            .map(|pixel| pixel.0[3])
            .collect::<Vec<_>>()
    };

    let augment = TrivialAugmentWideInit::default().build()?;
    let mut rng = StdRng::seed_from_u64(9);

    for _ in 0..200 {
        let output = augment.augment::<(), _>(Sample::Raster(raster.clone()), &mut rng)?;
        match output {
            Sample::Raster(output) => {
                assert!(matches!(output, DynamicImage::ImageRgba8(_)));
                assert_eq!(output.dimensions(), (16, 12));
                assert_eq!(alpha(&output), alpha(&raster));
            }
            _ => panic!("expect a raster image"),
        }
    }
    Ok(())
}

#[test]
fn solarize_zero_image() -> Result<()> {
    let image = Tensor::zeros(&[3, 224, 224], (Kind::Uint8, Device::Cpu));
    let output = apply_op(
        &image,
        Op::Solarize,
        128.0,
        Interpolation::Nearest,
        &Fill::default(),
    )?;
    assert!(output.equal(&image));
    Ok(())
}

#[test]
fn translation_magnitude_is_truncated() -> Result<()> {
    let image = Tensor::randint(256, &[3, 32, 32], (Kind::Uint8, Device::Cpu));
    let fill = Fill::default();
    let lhs = apply_op(&image, Op::TranslateX, 10.5, Interpolation::Nearest, &fill)?;
    let rhs = apply_op(&image, Op::TranslateX, 10.0, Interpolation::Nearest, &fill)?;
    assert!(lhs.equal(&rhs));
    Ok(())
}

#[test]
fn sign_flips_are_balanced() -> Result<()> {
    let params = SamplingParams::new(3, 64, 64)?;
    let catalogue = Catalogue::rand_augment();
    let entry = catalogue.lookup(Op::ShearX)?;
    let mut rng = StdRng::seed_from_u64(5);

    let negatives = (0..10000)
        .map(|_| params.random_magnitude(entry, 31, 31, &mut rng))
        .filter(|magnitude| matches!(magnitude, Ok(magnitude) if *magnitude < 0.0))
        .count();
    // bin 0 yields zero, which is never counted as negative
    assert!((4300..5300).contains(&negatives), "{}", negatives);
    Ok(())
}

#[test]
fn sub_policy_is_reproducible() -> Result<()> {
    let augment = AutoAugmentInit::default().build()?;
    let sub_policy = SubPolicy([
        PolicyStep {
            op: Op::Rotate,
            probability: Probability::try_from(0.5)?,
            bin: Some(9),
        },
        PolicyStep {
            op: Op::Posterize,
            probability: Probability::try_from(0.5)?,
            bin: Some(8),
        },
    ]);
    let image = Tensor::randint(256, &[3, 32, 32], (Kind::Uint8, Device::Cpu));

    let outputs: Vec<Tensor> = (0..2)
        .map(|_| {
            let mut rng = StdRng::seed_from_u64(2022);
            (0..8)
                .map(|_| augment.apply_sub_policy(&image, &sub_policy, &mut rng))
                .collect::<Result<Vec<_>>>()
                .map(|outputs| Tensor::stack(&outputs, 0))
        })
        .collect::<Result<_>>()?;
    assert!(outputs[0].equal(&outputs[1]));
    assert_eq!(AUTO_AUGMENT_BINS, 10);
    Ok(())
}

#[test]
fn certain_sub_policy_is_deterministic() -> Result<()> {
    let augment = AutoAugmentInit::default().build()?;
    let mut sub_policy = augment.sub_policies()[0];
    sub_policy.0.iter_mut().for_each(|step| {
        step.probability = Probability::one();
    });
    let image = Tensor::randint(256, &[3, 32, 32], (Kind::Uint8, Device::Cpu));

    let lhs = augment.apply_sub_policy(&image, &sub_policy, &mut StdRng::seed_from_u64(7))?;
    let rhs = augment.apply_sub_policy(&image, &sub_policy, &mut StdRng::seed_from_u64(7))?;
    assert!(lhs.equal(&rhs));
    assert!(!lhs.equal(&image));
    Ok(())
}

#[test]
fn tiny_alpha_mixes_one_hot() -> Result<()> {
    let augment = AugMixInit {
        alpha: noisy_float::prelude::r64(1e-6),
        ..Default::default()
    }
    .build()?;
    let mut rng = StdRng::seed_from_u64(6);

    for _ in 0..50 {
        let weights = augment.sample_mixing_weights(3, &mut rng);
        for (original, chains) in weights.original.iter().zip(&weights.chains) {
            let max = chains.iter().copied().fold(*original, f64::max);
            assert!((max - 1.0).abs() <= 1e-6);
            assert!((original + chains.iter().sum::<f64>() - 1.0).abs() <= 1e-6);
        }
    }
    Ok(())
}
