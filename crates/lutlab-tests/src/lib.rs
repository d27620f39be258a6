//! Integration tests for lutlab crates.
//!
//! End-to-end checks across the format, resampling, curve and matrix
//! crates, going through real files where it matters.

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use lutlab_lut::{
        ConvertOptions, CurveRegistry, Dimensionality, Direction, Domain, ExportPreset, FormatHandler,
        FormatRegistry, Interpolation, Lut, LutError, LutFormat, Precision, ResampleOptions,
        WriteOptions,
    };
    use std::fs;
    use tempfile::tempdir;

    fn curve_lut(dim: Dimensionality, size: usize) -> Lut {
        let ramp = |g: f32| -> Vec<f32> {
            (0..size)
                .map(|i| (i as f32 / (size - 1) as f32).powf(g))
                .collect()
        };
        match dim {
            Dimensionality::OneD => Lut::one_d(ramp(2.2), Domain::UNIT).unwrap(),
            _ => Lut::two_d([ramp(1.8), ramp(2.2), ramp(2.6)], [Domain::UNIT; 3]).unwrap(),
        }
    }

    fn graded_cube(size: usize) -> Lut {
        let identity = Lut::identity(Dimensionality::ThreeD, size).unwrap();
        let lattice = identity
            .lattice()
            .unwrap()
            .iter()
            .map(|&[r, g, b]| [0.9 * r + 0.05 * g, g * g, 0.5 * (b + r)])
            .collect();
        Lut::three_d(size, lattice, [Domain::UNIT; 3]).unwrap()
    }

    fn sample_of(dim: Dimensionality) -> Lut {
        match dim {
            Dimensionality::ThreeD => graded_cube(5),
            _ => curve_lut(dim, 16),
        }
    }

    fn assert_close(original: &Lut, back: &Lut, precision: Precision, what: &str) {
        let pairs: Vec<(f32, f32)> = match (original.curves(), back.curves()) {
            (Some(a), Some(b)) => a.iter().flatten().copied().zip(b.iter().flatten().copied()).collect(),
            _ => original
                .lattice()
                .unwrap()
                .iter()
                .flatten()
                .copied()
                .zip(back.lattice().unwrap().iter().flatten().copied())
                .collect(),
        };
        for (expected, got) in pairs {
            assert!(
                (expected - got).abs() <= precision.tolerance(expected),
                "{what}: expected {expected}, got {got} at {precision}"
            );
        }
    }

    /// Every format, every shape it stores, through a real file.
    #[test]
    fn test_every_format_roundtrips() {
        let dir = tempdir().unwrap();
        for format in LutFormat::ALL {
            for &dim in format.supported_dimensionalities() {
                let lut = sample_of(dim);
                let path = dir.path().join(format!("rt_{dim}.{}", format.extensions()[0]));
                let report = lutlab_lut::write_lut(&lut, &path, format, None).unwrap();
                let (back, detected) = lutlab_lut::read_lut(&path, None).unwrap();

                let what = format!("{} {dim}", format.tag());
                assert_eq!(detected, format, "{what}");
                assert_eq!(back.dimensionality(), dim, "{what}");
                assert_eq!(back.size(), lut.size(), "{what}");
                assert_eq!(back.domains(), lut.domains(), "{what}");
                assert_close(&lut, &back, report.precision, &what);
            }
        }
    }

    #[test]
    fn test_domain_roundtrip() {
        let slog3 = CurveRegistry::global().get("SLog3").unwrap().natural_domain(Direction::Encode);
        let domains = [Domain::new(-0.125, 2.5).unwrap(), slog3, Domain::new(0.0, 1.1).unwrap()];
        for domain in domains {
            let lut = Lut::two_d([vec![0.0, 0.5, 1.0], vec![0.0, 0.25, 1.0], vec![0.0, 0.75, 1.0]], [domain; 3])
                .unwrap();
            for format in [LutFormat::Cube, LutFormat::Csp, LutFormat::Spi1d, LutFormat::Json] {
                for precision in [Precision::Float, Precision::Half] {
                    let options = WriteOptions { precision: Some(precision) };
                    let bytes = format.write(&lut, &options).unwrap();
                    let back = format.read(&bytes).unwrap();
                    assert_eq!(back.domains(), lut.domains(), "{} at {precision}", format.tag());
                }
            }
            assert!(matches!(
                LutFormat::Discreet1dl.write(&lut, &WriteOptions::default()),
                Err(LutError::IncompatibleConversion(_))
            ));
        }
    }

    #[test]
    fn test_integer_precisions() {
        let lut = graded_cube(3);
        for bits in [10, 12, 16] {
            let precision = Precision::Int(bits);
            let options = WriteOptions { precision: Some(precision) };
            let bytes = LutFormat::ThreeDl.write(&lut, &options).unwrap();
            let back = LutFormat::ThreeDl.read(&bytes).unwrap();
            assert_eq!(back.precision(), precision);
            assert_close(&lut, &back, precision, "3dl");
        }
        let err = LutFormat::Cube
            .write(&lut, &WriteOptions { precision: Some(Precision::Int(10)) })
            .unwrap_err();
        assert!(matches!(err, LutError::IncompatibleConversion(_)));
    }

    /// Three samples per channel resampled to five.
    #[test]
    fn test_resample_three_to_five() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("ramp.spi1d");
        fs::write(
            &source,
            "Version 1\nFrom 0.0 1.0\nLength 3\nComponents 3\n{\n0 0 0\n0.5 0.5 0.5\n1 1 1\n}\n",
        )
        .unwrap();
        let target = dir.path().join("ramp5.cube");
        let options = ConvertOptions { target_size: Some(5), ..Default::default() };
        let report = lutlab_lut::convert(&source, &target, &options).unwrap();
        assert_eq!(report.size, 5);

        let (back, _) = lutlab_lut::read_lut(&target, None).unwrap();
        for curve in back.curves().unwrap() {
            assert_eq!(curve, &vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        }
    }

    #[test]
    fn test_3d_to_1d_fails_without_output() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("grade.cube");
        lutlab_lut::write_lut(&graded_cube(5), &source, LutFormat::Cube, None).unwrap();

        let target = dir.path().join("grade.json");
        let options = ConvertOptions {
            target_dimensionality: Some(Dimensionality::OneD),
            ..Default::default()
        };
        let err = lutlab_lut::convert(&source, &target, &options).unwrap_err();
        assert!(matches!(err, LutError::IncompatibleConversion(_)));
        assert!(!target.exists());

        // 3D into a 1D-only format fails the same way.
        let target = dir.path().join("grade.1dl");
        let err = lutlab_lut::convert(&source, &target, &ConvertOptions::default()).unwrap_err();
        assert!(matches!(err, LutError::IncompatibleConversion(_)));
        assert!(!target.exists());
    }

    #[test]
    fn test_unsupported_and_missing() {
        let dir = tempdir().unwrap();
        let err = lutlab_lut::convert(
            &dir.path().join("a.cube"),
            &dir.path().join("b.tiff"),
            &ConvertOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, LutError::UnsupportedFormat(_)));

        let err = lutlab_lut::convert(
            &dir.path().join("missing.cube"),
            &dir.path().join("b.cube"),
            &ConvertOptions::default(),
        )
        .unwrap_err();
        assert!(err.is_io());
    }

    #[test]
    fn test_parse_error_location() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("broken.cube");
        fs::write(&source, "LUT_3D_SIZE 2\n0 0 0\n1 0 zero\n").unwrap();
        let err = lutlab_lut::read_lut(&source, None).unwrap_err();
        assert_eq!(err.to_string(), "parse error at line 3: invalid number 'zero'");
    }

    #[test]
    fn test_resample_identity_and_monotonic() {
        let lut = graded_cube(5);
        for interpolation in [Interpolation::Trilinear, Interpolation::Tetrahedral] {
            let options = ResampleOptions { interpolation, domain: None };
            let same = lutlab_lut::resample(&lut, 5, None, &options).unwrap();
            assert_eq!(same.size(), lut.size());
            assert_close(&lut, &same, Precision::Float, "same size");

            let up = lutlab_lut::resample(&lut, 9, None, &options).unwrap();
            let n = up.size();
            let lattice = up.lattice().unwrap();
            for b in 0..n {
                for g in 0..n {
                    for r in 1..n {
                        let prev = lattice[up.lattice_index(r - 1, g, b)];
                        let cur = lattice[up.lattice_index(r, g, b)];
                        assert!(cur[0] >= prev[0] - 1e-6, "{interpolation} red not monotonic");
                    }
                }
            }
        }
    }

    #[test]
    fn test_curve_domain_coverage() {
        let lut = lutlab_lut::sample("linear", 5, Domain::new(-1.0, 3.0).unwrap()).unwrap();
        assert_eq!(lut.curves().unwrap()[0], vec![-1.0, 0.0, 1.0, 2.0, 3.0]);
        assert_eq!(lut.domains()[0], Domain::new(-1.0, 3.0).unwrap());

        let err = lutlab_lut::sample("not-a-curve", 5, Domain::UNIT).unwrap_err();
        assert!(matches!(err, LutError::UnknownCurve(_)));
    }

    #[test]
    fn test_curves_match_transfer_crate() {
        let lut = lutlab_lut::sample("sRGB", 11, Domain::UNIT).unwrap();
        for (i, &v) in lut.curves().unwrap()[0].iter().enumerate() {
            let x = Domain::UNIT.coordinate(i, 11);
            assert_abs_diff_eq!(v, lutlab_transfer::srgb::encode(x), epsilon = 1e-6);
        }
    }

    #[test]
    fn test_every_curve_monotonic_over_natural_domain() {
        for curve in lutlab_lut::CurveRegistry::global().curves() {
            for direction in [Direction::Encode, Direction::Decode] {
                let domain = curve.natural_domain(direction);
                let lut = lutlab_lut::sample_directed(&curve.name, direction, 256, domain).unwrap();
                let values = &lut.curves().unwrap()[0];
                for w in values.windows(2) {
                    assert!(w[1] >= w[0] - 1e-6 * (1.0 + w[0].abs()), "{} {direction}", curve.name);
                }
            }
        }
    }

    #[test]
    fn test_gamma_inverse_composes_to_identity() {
        let gamma = lutlab_lut::sample("gamma2.2", 1024, Domain::UNIT).unwrap();
        let inverse = lutlab_lut::invert(&gamma).unwrap();
        for i in 0..=20 {
            let x = i as f32 / 20.0;
            let y = gamma.eval_curve(0, x).unwrap();
            let back = inverse.eval_curve(0, y).unwrap();
            assert_abs_diff_eq!(back, x, epsilon = 5e-3);
        }
    }

    #[test]
    fn test_curve_to_every_1d_format() {
        let dir = tempdir().unwrap();
        for format in LutFormat::ALL {
            let path = dir.path().join(format!("logc.{}", format.extensions()[0]));
            let options = ConvertOptions { target_size: Some(64), ..Default::default() };
            let result =
                lutlab_lut::sample_curve_to_file("LogC3", Direction::Encode, Domain::UNIT, &path, &options);
            if format.supports(Dimensionality::OneD) || format.supports(Dimensionality::TwoD) {
                let report = result.unwrap();
                assert_eq!(report.size, 64, "{format}");
                assert!(path.exists());
            } else {
                assert!(matches!(result, Err(LutError::IncompatibleConversion(_))), "{format}");
                assert!(!path.exists());
            }
        }
    }

    #[test]
    fn test_preset_drives_conversion() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("lustre.json"),
            r#"{"type": "3D", "extension": "3dl", "output_bitdepth": 10, "cube_size": 17, "title": "show"}"#,
        )
        .unwrap();
        let source = dir.path().join("grade.cube");
        lutlab_lut::write_lut(&graded_cube(5), &source, LutFormat::Cube, None).unwrap();

        let preset = ExportPreset::find_in(Some(dir.path()), "lustre").unwrap();
        let options = preset.apply(&ConvertOptions::default(), false).unwrap();
        let target = dir.path().join("grade.out");
        let report = lutlab_lut::convert(&source, &target, &options).unwrap();
        assert_eq!(report.format, LutFormat::ThreeDl);
        assert_eq!(report.size, 17);
        assert_eq!(report.precision, Precision::Int(10));

        let (back, _) = lutlab_lut::read_lut(&target, Some(LutFormat::ThreeDl)).unwrap();
        assert_eq!(back.size(), 17);
        assert_eq!(back.title(), Some("show"));
    }

    #[test]
    fn test_parallel_conversions() {
        use rayon::prelude::*;

        let dir = tempdir().unwrap();
        let sources: Vec<_> = (0..8)
            .map(|i| {
                let path = dir.path().join(format!("in{i}.cube"));
                lutlab_lut::write_lut(&graded_cube(3 + i), &path, LutFormat::Cube, None).unwrap();
                path
            })
            .collect();
        let options = ConvertOptions { target_size: Some(9), ..Default::default() };
        let reports: Vec<_> = sources
            .par_iter()
            .map(|src| lutlab_lut::convert(src, &src.with_extension("spi3d"), &options))
            .collect();
        for report in reports {
            let report = report.unwrap();
            assert_eq!(report.format, LutFormat::Spi3d);
            assert_eq!(report.size, 9);
        }
    }

    #[test]
    fn test_registry_resolution() {
        let registry = FormatRegistry::global();
        assert_eq!(registry.resolve("CUBE").unwrap(), LutFormat::Cube);
        assert_eq!(registry.resolve(".spi1d").unwrap(), LutFormat::Spi1d);
        assert!(matches!(registry.resolve("exr"), Err(LutError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_srgb_white_point() {
        use lutlab_math::Vec3;
        use lutlab_primaries::{ColorspaceDescriptor, build_matrix};

        let srgb = ColorspaceDescriptor::custom(
            "sRGB",
            [(0.64, 0.33), (0.30, 0.60), (0.15, 0.06)],
            (0.3127, 0.3290),
        );
        let pair = build_matrix(&srgb).unwrap();
        let white = pair.rgb_to_xyz * Vec3::ONE;
        let expected = Vec3::new(0.3127 / 0.3290, 1.0, (1.0 - 0.3127 - 0.3290) / 0.3290);
        assert!(white.max_abs_diff(expected) < 1e-4);

        let product = pair.xyz_to_rgb.mul_mat(&pair.rgb_to_xyz);
        assert!(product.max_abs_diff(&lutlab_math::Mat3::IDENTITY) < 1e-9);
    }

    #[test]
    fn test_colinear_primaries_are_singular() {
        use lutlab_primaries::{ColorspaceDescriptor, PrimariesError, build_matrix};

        let flat = ColorspaceDescriptor::custom(
            "flat",
            [(0.2, 0.2), (0.4, 0.4), (0.6, 0.6)],
            (0.3127, 0.3290),
        );
        assert!(matches!(build_matrix(&flat), Err(PrimariesError::SingularMatrix { .. })));
    }

    #[test]
    fn test_acescg_to_srgb_keeps_neutrals() {
        use lutlab_math::{Adaptation, Vec3};
        use lutlab_primaries::{
            BuiltinColorimetry, ColorimetryProvider, ConversionOptions, Endpoint, rgb_to_rgb_matrix,
        };

        let provider = BuiltinColorimetry;
        let src = Endpoint::Rgb(provider.descriptor("ACEScg").unwrap());
        let dst = Endpoint::Rgb(provider.descriptor("sRGB").unwrap());
        let options = ConversionOptions { primaries_only: false, adaptation: Adaptation::Bradford };
        let m = rgb_to_rgb_matrix(&src, &dst, options).unwrap();
        let grey = m * Vec3::splat(0.18);
        assert!(grey.max_abs_diff(Vec3::splat(0.18)) < 1e-4);
    }
}
