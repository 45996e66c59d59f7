//! Integration tests for the basis extraction crates.
//!
//! This crate contains end-to-end tests that run point sets through the
//! whole pipeline: point files -> covariance -> eigen decomposition ->
//! orthonormal frame.

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use basis_core::prelude::*;
    use basis_math::{
        covariance, diagonalize, orthonormal_basis, read_points, write_points, AxisPlane, Eigen3,
        Mat3, PrincipalFrame, Vec3,
    };
    use tempfile::tempdir;

    /// Small deterministic generator so fixtures are reproducible.
    struct Lcg(u64);

    impl Lcg {
        fn next(&mut self) -> f32 {
            self.0 = self
                .0
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (self.0 >> 40) as f32 / (1u64 << 24) as f32
        }

        /// Uniform in [-1, 1).
        fn signed(&mut self) -> f32 {
            self.next() * 2.0 - 1.0
        }
    }

    fn rotation(yaw: f32, pitch: f32, roll: f32) -> Mat3 {
        Mat3::from_glam(glam::Mat3::from_euler(glam::EulerRot::ZYX, yaw, pitch, roll))
    }

    fn assert_right_handed_orthonormal(m: &Mat3, eps: f32) {
        for i in 0..3 {
            assert_abs_diff_eq!(m.col(i).length(), 1.0, epsilon = eps);
            for j in (i + 1)..3 {
                assert_abs_diff_eq!(m.col(i).dot(m.col(j)), 0.0, epsilon = eps);
            }
        }
        assert_abs_diff_eq!(m.determinant(), 1.0, epsilon = eps);
    }

    /// The axis-aligned four-point cross needs no rotation at all.
    #[test]
    fn test_axis_aligned_cross_pipeline() {
        let points = [
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::new(0.0, -2.0, 0.0),
        ];
        let cov = covariance(&points, SampleWalk::full(4)).unwrap();
        assert_eq!(cov, Mat3::diagonal(0.5, 2.0, 0.0));

        let eigen = diagonalize(&cov, &JacobiConfig::default()).unwrap();
        assert_eq!(eigen.basis, Mat3::IDENTITY);
        assert_eq!(eigen.eigenvalues, Vec3::new(0.5, 2.0, 0.0));
        assert_eq!(eigen.iterations, 0);
        assert!(eigen.converged);

        let sorted = eigen.sorted_descending();
        assert_eq!(sorted.eigenvalues, Vec3::new(2.0, 0.5, 0.0));
        assert_right_handed_orthonormal(&sorted.basis, 1e-6);
    }

    #[test]
    fn test_rotated_spread_recovers_eigenvalues() {
        let r = rotation(0.4, -1.1, 2.3);
        let cov = r * Mat3::diagonal(4.0, 1.0, 0.25) * r.transpose();
        let eigen = Eigen3::new(&cov).unwrap();
        assert!(eigen.converged);
        assert!(eigen.iterations < 500);

        let sorted = eigen.sorted_descending();
        assert_abs_diff_eq!(sorted.eigenvalues, Vec3::new(4.0, 1.0, 0.25), epsilon = 1e-3);
        for i in 0..3 {
            assert_abs_diff_eq!(sorted.eigenvector(i).dot(r.col(i)).abs(), 1.0, epsilon = 1e-4);
        }
        assert_right_handed_orthonormal(&sorted.basis, 1e-4);
    }

    /// `B diag(lambda) B^T` rebuilds positive semi-definite inputs.
    #[test]
    fn test_reconstruction_of_random_covariances() {
        let mut rng = Lcg(7);
        for _ in 0..50 {
            let a = Mat3::from_rows([
                [rng.signed(), rng.signed(), rng.signed()],
                [rng.signed(), rng.signed(), rng.signed()],
                [rng.signed(), rng.signed(), rng.signed()],
            ]);
            let cov = a * a.transpose();
            let eigen = Eigen3::new(&cov).unwrap();
            assert!(eigen.converged);
            assert_right_handed_orthonormal(&eigen.basis, 1e-4);
            assert_abs_diff_eq!(eigen.reconstruct(), cov, epsilon = 1e-3);

            // index-matched: each column is an eigenvector of its own value
            for i in 0..3 {
                let v = eigen.eigenvector(i);
                assert_abs_diff_eq!(cov * v, v * eigen.eigenvalues[i], epsilon = 1e-3);
            }
        }
    }

    /// Every finite input pair and every layout gives a usable frame.
    #[test]
    fn test_orthonormal_basis_never_degenerates() {
        let dirs = [
            Vec3::ZERO,
            Vec3::new(0.0, 1e-8, 0.0),
            Vec3::X,
            Vec3::Y,
            Vec3::Z,
            -Vec3::X,
            -Vec3::Z,
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(-2.0, 0.5, 1.0),
            Vec3::new(0.0, 0.0, 250.0),
        ];
        for &plane in AxisPlane::all() {
            for &primary in &dirs {
                for &secondary in &dirs {
                    let frame = orthonormal_basis(primary, secondary, plane);
                    for i in 0..3 {
                        assert!(
                            !frame.col(i).is_null(),
                            "zero column for {:?} {:?} {}",
                            primary,
                            secondary,
                            plane
                        );
                    }
                    assert_right_handed_orthonormal(&frame, 1e-4);
                }
            }
        }
    }

    /// Secondary = k * primary plus a small random offset, for large and
    /// unit-scale primaries.
    #[test]
    fn test_orthonormal_basis_nearly_parallel_sweep() {
        let mut rng = Lcg(11);
        let cases: [(f32, f32); 4] = [(1000.0, 1e-3), (1.0, 3e-6), (1.0, 1e-3), (1e-2, 1e-6)];
        for (scale, max_offset) in cases {
            for _ in 0..200 {
                let u = Vec3::new(rng.signed(), rng.signed(), rng.signed()) * scale;
                if u.is_null() {
                    continue;
                }
                let k = if rng.next() < 0.5 { 1.5 } else { -0.7 };
                let offset = Vec3::new(rng.signed(), rng.signed(), rng.signed()) * max_offset;
                let v = u * k + offset;
                for &plane in AxisPlane::all() {
                    let frame = orthonormal_basis(u, v, plane);
                    assert_right_handed_orthonormal(&frame, 1e-4);
                }
            }
        }
    }

    #[test]
    fn test_planar_cloud_frame() {
        let a = Vec3::new(1.0, 1.0, 0.0).normalize();
        let b = Vec3::Z;
        let normal = a.cross(b);
        let mut points = Vec::new();
        for i in -3..=3 {
            for j in -3..=3 {
                points.push(a * (2.0 * i as f32) + b * j as f32 + Vec3::new(5.0, 5.0, 5.0));
            }
        }

        let walk = SampleWalk::full(points.len());
        let frame = PrincipalFrame::from_points(&points, walk, &AnalysisConfig::default()).unwrap();
        assert_eq!(frame.rank, 2);
        assert_abs_diff_eq!(frame.centroid, Vec3::new(5.0, 5.0, 5.0), epsilon = 1e-4);
        assert_abs_diff_eq!(frame.eigen.eigenvalues.x, 16.0, epsilon = 1e-3);
        assert_abs_diff_eq!(frame.eigen.eigenvalues.y, 4.0, epsilon = 1e-3);
        assert_abs_diff_eq!(frame.axes.col(0).dot(a).abs(), 1.0, epsilon = 1e-4);
        assert_abs_diff_eq!(frame.axes.col(1).dot(b).abs(), 1.0, epsilon = 1e-4);
        assert_abs_diff_eq!(frame.axes.col(2).dot(normal).abs(), 1.0, epsilon = 1e-4);
        assert_right_handed_orthonormal(&frame.axes, 1e-4);

        // every point lies in the local xy plane
        for &p in &points {
            assert_abs_diff_eq!(frame.to_local(p).z, 0.0, epsilon = 1e-3);
        }
    }

    /// A strided subset of a large cloud tracks the full statistics.
    #[test]
    fn test_sparse_walk_approximates_full_cloud() {
        let r = rotation(1.2, 0.3, -0.7);
        let mut rng = Lcg(42);
        let points: Vec<Vec3> = (0..999)
            .map(|_| r * Vec3::new(3.0 * rng.signed(), rng.signed(), 0.3 * rng.signed()))
            .collect();

        let config = AnalysisConfig::default();
        let full = PrincipalFrame::from_points(&points, SampleWalk::full(999), &config).unwrap();
        let sparse =
            PrincipalFrame::from_points(&points, SampleWalk::new(333, 3, 1), &config).unwrap();

        for i in 0..3 {
            let (f, s) = (full.eigen.eigenvalues[i], sparse.eigen.eigenvalues[i]);
            assert!((f - s).abs() < 0.25 * f, "eigenvalue {}: full {} sparse {}", i, f, s);
        }
        assert!(full.axes.col(0).dot(sparse.axes.col(0)).abs() > 0.95);
        assert!(full.axes.col(0).dot(r.col(0)).abs() > 0.95);
    }

    #[test]
    fn test_degenerate_requests_are_typed() {
        let points = vec![Vec3::ONE; 8];
        let err = covariance(&points[..1], SampleWalk::full(1)).unwrap_err();
        assert!(matches!(err, Error::InsufficientSamples { distinct: 1 }));
        assert!(err.is_degenerate());

        let err = covariance(&points, SampleWalk::new(8, 3, 0)).unwrap_err();
        assert!(matches!(err, Error::InvalidStride { stride: 3, max: 2 }));

        // coincident points are a valid, zero spread
        assert_eq!(covariance(&points, SampleWalk::full(8)).unwrap(), Mat3::ZERO);

        let mut bad = Mat3::IDENTITY;
        bad.set(0, 1, f32::NAN);
        let err = diagonalize(&bad, &JacobiConfig::default()).unwrap_err();
        assert!(err.is_non_finite());
    }

    #[test]
    fn test_point_file_pipeline() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cloud.xyz");

        let r = rotation(0.2, 0.9, 0.1);
        let mut rng = Lcg(3);
        let points: Vec<Vec3> = (0..64)
            .map(|_| r * Vec3::new(2.0 * rng.signed(), 0.5 * rng.signed(), 0.1 * rng.signed()))
            .collect();
        write_points(&path, &points).unwrap();

        let loaded = read_points(&path).unwrap();
        assert_eq!(loaded, points);

        let config = AnalysisConfig::default();
        let walk = SampleWalk::full(64);
        let from_file = PrincipalFrame::from_points(&loaded, walk, &config).unwrap();
        let direct = PrincipalFrame::from_points(&points, walk, &config).unwrap();
        assert_eq!(from_file, direct);
    }

    #[test]
    fn test_hand_written_point_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cross.txt");
        std::fs::write(
            &path,
            "# axis-aligned cross\n1 0 0\n-1, 0, 0\n\n0 2 0 # top\n0,-2,0\n",
        )
        .unwrap();

        let points = read_points(&path).unwrap();
        assert_eq!(points.len(), 4);
        let cov = covariance(&points, SampleWalk::full(points.len())).unwrap();
        assert_eq!(cov, Mat3::diagonal(0.5, 2.0, 0.0));
    }

    #[test]
    fn test_config_json_roundtrip() {
        let config = AnalysisConfig {
            jacobi: JacobiConfig {
                tolerance: 1e-6,
                max_iterations: 64,
            },
            rank_epsilon: 1e-3,
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: AnalysisConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);

        let partial: AnalysisConfig =
            serde_json::from_str(r#"{"jacobi":{"tolerance":1e-6}}"#).unwrap();
        assert_eq!(partial.jacobi.tolerance, 1e-6);
        assert_eq!(partial.jacobi.max_iterations, JacobiConfig::default().max_iterations);
    }

    #[test]
    fn test_frame_json_roundtrip() {
        let points = [
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::new(-3.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.5),
            Vec3::new(0.0, -1.0, -0.5),
            Vec3::new(0.0, 0.0, 0.2),
        ];
        let config = AnalysisConfig::default();
        let frame = PrincipalFrame::from_points(&points, SampleWalk::full(5), &config).unwrap();
        let json = serde_json::to_string(&frame).unwrap();
        let back: PrincipalFrame = serde_json::from_str(&json).unwrap();
        assert_eq!(back, frame);
    }
}
