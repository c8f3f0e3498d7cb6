//! # Solid Queries
//!
//! Local-frame geometry used by overlap checking: exact bounds, signed
//! inside depth and deterministic surface sampling.

use config::constants::{normalize_angle_deg, ANGLE_EPSILON_DEG, EPSILON, FULL_CIRCLE_DEG};
use glam::DVec3;

use super::{Shape, Solid};
use crate::aabb::Aabb;

impl Solid {
    /// Exact axis-aligned bounds of the solid in its own frame.
    pub fn local_bounds(&self) -> Aabb {
        self.shape.local_bounds()
    }

    /// Distance from `point` (local frame) to the nearest boundary: positive
    /// inside, zero on the boundary, negative outside.
    pub fn inside_depth(&self, point: DVec3) -> f64 {
        self.shape.inside_depth(point)
    }

    /// Deterministic sample of roughly `count` points covering every
    /// bounding surface, in the local frame.
    pub fn surface_points(&self, count: usize) -> Vec<DVec3> {
        self.shape.surface_points(count)
    }

    /// Surface sample limited to `region` (local frame).
    pub fn surface_points_within(&self, count: usize, region: &Aabb) -> Vec<DVec3> {
        self.shape.surface_points_within(count, region)
    }
}

impl Shape {
    /// Exact axis-aligned bounds in the local frame.
    pub fn local_bounds(&self) -> Aabb {
        match *self {
            Shape::Box {
                half_x,
                half_y,
                half_z,
            } => Aabb::from_center_half_extents(DVec3::ZERO, DVec3::new(half_x, half_y, half_z)),
            Shape::TubeSector {
                r_min,
                r_max,
                half_z,
                start_angle,
                delta_angle,
            } => {
                let end_angle = start_angle + delta_angle;
                // Extremes sit at the sector ends or where the outer arc
                // crosses a coordinate axis.
                let ends = [start_angle, end_angle]
                    .into_iter()
                    .flat_map(|phi| [polar(r_min, phi), polar(r_max, phi)]);
                let crossings = [0.0, 90.0, 180.0, 270.0]
                    .into_iter()
                    .filter(|phi| in_sector(*phi, start_angle, delta_angle))
                    .map(|phi| polar(r_max, phi));
                let xy = Aabb::from_points(ends.chain(crossings))
                    .unwrap_or_else(|| Aabb::from_corners(DVec3::ZERO, DVec3::ZERO));
                Aabb::from_corners(
                    DVec3::new(xy.min().x, xy.min().y, -half_z),
                    DVec3::new(xy.max().x, xy.max().y, half_z),
                )
            }
        }
    }

    /// Signed distance to the nearest boundary (positive inside).
    pub fn inside_depth(&self, point: DVec3) -> f64 {
        match *self {
            Shape::Box {
                half_x,
                half_y,
                half_z,
            } => (half_x - point.x.abs())
                .min(half_y - point.y.abs())
                .min(half_z - point.z.abs()),
            Shape::TubeSector {
                r_min,
                r_max,
                half_z,
                start_angle,
                delta_angle,
            } => {
                let r = point.x.hypot(point.y);
                let mut depth = (half_z - point.z.abs()).min(r_max - r);
                if r_min > 0.0 {
                    depth = depth.min(r - r_min);
                }
                if delta_angle < FULL_CIRCLE_DEG {
                    let phi = point.y.atan2(point.x).to_degrees();
                    let rel = normalize_angle_deg(phi - start_angle);
                    let wrapped = FULL_CIRCLE_DEG - rel;
                    if rel <= delta_angle + ANGLE_EPSILON_DEG || wrapped <= ANGLE_EPSILON_DEG {
                        let to_cut = if wrapped <= ANGLE_EPSILON_DEG {
                            0.0
                        } else {
                            rel.min(delta_angle - rel).max(0.0)
                        };
                        depth = depth.min(distance_to_half_plane(r, to_cut));
                    } else {
                        let gap = (rel - delta_angle).min(wrapped);
                        depth = depth.min(-distance_to_half_plane(r, gap));
                    }
                }
                depth
            }
        }
    }

    /// Deterministic surface sample of roughly `count` points.
    pub fn surface_points(&self, count: usize) -> Vec<DVec3> {
        self.surface_points_within(count, &self.local_bounds())
    }

    /// Surface sample restricted to the part of each surface that can lie
    /// inside `region` (local frame). The grid density is the same as for
    /// the whole solid, so a small region is sampled finely.
    pub fn surface_points_within(&self, count: usize, region: &Aabb) -> Vec<DVec3> {
        let region = region.expanded(EPSILON);
        let (lo, hi) = (region.min(), region.max());
        match *self {
            Shape::Box {
                half_x,
                half_y,
                half_z,
            } => {
                let half = DVec3::new(half_x, half_y, half_z);
                let k = grid_side(count, 6);
                let mut points = Vec::with_capacity(6 * k * k + 8);
                for sign in [-1.0, 1.0] {
                    for (axis, u_axis, v_axis) in [(0, 1, 2), (1, 0, 2), (2, 0, 1)] {
                        let face = sign * half[axis];
                        if face < lo[axis] || face > hi[axis] {
                            continue;
                        }
                        let Some((u0, u1)) = clip(half[u_axis], lo[u_axis], hi[u_axis]) else {
                            continue;
                        };
                        let Some((v0, v1)) = clip(half[v_axis], lo[v_axis], hi[v_axis]) else {
                            continue;
                        };
                        for (u, v) in grid(k, u0, u1, v0, v1) {
                            let mut point = DVec3::ZERO;
                            point[axis] = face;
                            point[u_axis] = u;
                            point[v_axis] = v;
                            points.push(point);
                        }
                    }
                }
                for i in 0..8u8 {
                    let corner = DVec3::new(
                        if i & 1 == 0 { -half_x } else { half_x },
                        if i & 2 == 0 { -half_y } else { half_y },
                        if i & 4 == 0 { -half_z } else { half_z },
                    );
                    if region.contains_point(corner) {
                        points.push(corner);
                    }
                }
                points
            }
            Shape::TubeSector {
                r_min,
                r_max,
                half_z,
                start_angle,
                delta_angle,
            } => {
                let end_angle = start_angle + delta_angle;
                let hollow = r_min > 0.0;
                let cut = delta_angle < FULL_CIRCLE_DEG;
                let surfaces = 3 + usize::from(hollow) + 2 * usize::from(cut);
                let k = grid_side(count, surfaces);
                let mut points = Vec::with_capacity(surfaces * k * k);

                let (d_min, d_max) = radial_reach(&region);
                let z_range = clip(half_z, lo.z, hi.z);
                let r_range = (r_min.max(d_min) <= r_max.min(d_max))
                    .then(|| (r_min.max(d_min), r_max.min(d_max)));

                if let Some((z0, z1)) = z_range {
                    let walls = [(r_max, true), (r_min, hollow)];
                    for (radius, present) in walls {
                        if present && (d_min..=d_max).contains(&radius) {
                            for (phi, z) in grid(k, start_angle, end_angle, z0, z1) {
                                points.push(polar(radius, phi) + DVec3::Z * z);
                            }
                        }
                    }
                }
                if let Some((r0, r1)) = r_range {
                    for cap in [half_z, -half_z] {
                        if (lo.z..=hi.z).contains(&cap) {
                            for (r, phi) in grid(k, r0, r1, start_angle, end_angle) {
                                points.push(polar(r, phi) + DVec3::Z * cap);
                            }
                        }
                    }
                    if let (true, Some((z0, z1))) = (cut, z_range) {
                        for (r, z) in grid(k, r0, r1, z0, z1) {
                            points.push(polar(r, start_angle) + DVec3::Z * z);
                            points.push(polar(r, end_angle) + DVec3::Z * z);
                        }
                    }
                }
                points
            }
        }
    }
}

// =============================================================================
// HELPERS
// =============================================================================

/// Point at radius `r` and angle `phi_deg` in the z = 0 plane.
fn polar(r: f64, phi_deg: f64) -> DVec3 {
    let (sin, cos) = phi_deg.to_radians().sin_cos();
    DVec3::new(r * cos, r * sin, 0.0)
}

/// Whether `phi_deg` lies in the closed sector `[start, start + delta]`.
fn in_sector(phi_deg: f64, start: f64, delta: f64) -> bool {
    if delta >= FULL_CIRCLE_DEG {
        return true;
    }
    let rel = normalize_angle_deg(phi_deg - start);
    rel <= delta + ANGLE_EPSILON_DEG || FULL_CIRCLE_DEG - rel <= ANGLE_EPSILON_DEG
}

/// Distance from a point at radius `r` to a cut half-plane `angle_deg` away.
fn distance_to_half_plane(r: f64, angle_deg: f64) -> f64 {
    if angle_deg >= 90.0 {
        r
    } else {
        r * angle_deg.to_radians().sin()
    }
}

/// `[-half, half]` clipped to `[lo, hi]`, `None` when they miss.
fn clip(half: f64, lo: f64, hi: f64) -> Option<(f64, f64)> {
    let (a, b) = ((-half).max(lo), half.min(hi));
    (a <= b).then_some((a, b))
}

/// Nearest and farthest distance from the Z axis to the XY footprint of
/// `region`.
fn radial_reach(region: &Aabb) -> (f64, f64) {
    let (lo, hi) = (region.min(), region.max());
    let nearest = DVec3::new(0.0_f64.clamp(lo.x, hi.x), 0.0_f64.clamp(lo.y, hi.y), 0.0);
    let far_x = lo.x.abs().max(hi.x.abs());
    let far_y = lo.y.abs().max(hi.y.abs());
    (nearest.length(), far_x.hypot(far_y))
}

/// Grid side length so that `surfaces` grids hold about `count` points.
fn grid_side(count: usize, surfaces: usize) -> usize {
    let per_surface = (count / surfaces).max(1);
    (per_surface as f64).sqrt().ceil() as usize
}

/// Cell centers of a `k` x `k` grid over `[u0, u1] x [v0, v1]`.
fn grid(k: usize, u0: f64, u1: f64, v0: f64, v1: f64) -> impl Iterator<Item = (f64, f64)> {
    let step = move |lo: f64, hi: f64, i: usize| lo + (hi - lo) * (i as f64 + 0.5) / k as f64;
    (0..k).flat_map(move |i| (0..k).map(move |j| (step(u0, u1, i), step(v0, v1, j))))
}
