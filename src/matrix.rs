// ============================================================================
// MATRIX — 4x4 column-major float matrices for the quad transform
// ============================================================================
//
// Stored as `m[column][row]`, which is exactly how WGSL lays out a
// `mat4x4<f32>` uniform, so a `Mat4` can be written to a buffer unchanged.

pub type Mat4 = [[f32; 4]; 4];

pub const IDENTITY: Mat4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

pub fn identity() -> Mat4 {
    IDENTITY
}

/// `a × b`: applying the result to a point applies `b` first, then `a`.
pub fn mul(a: &Mat4, b: &Mat4) -> Mat4 {
    let mut out = [[0.0f32; 4]; 4];
    for (col, out_col) in out.iter_mut().enumerate() {
        for (row, cell) in out_col.iter_mut().enumerate() {
            *cell = (0..4).map(|k| a[k][row] * b[col][k]).sum();
        }
    }
    out
}

pub fn translation(x: f32, y: f32, z: f32) -> Mat4 {
    let mut m = IDENTITY;
    m[3][0] = x;
    m[3][1] = y;
    m[3][2] = z;
    m
}

/// Rotation about +Z; a positive angle turns counter-clockwise.
pub fn rotation_z(angle: f32) -> Mat4 {
    let (s, c) = angle.sin_cos();
    let mut m = IDENTITY;
    m[0][0] = c;
    m[0][1] = s;
    m[1][0] = -s;
    m[1][1] = c;
    m
}

/// x' = x + k·y
pub fn shear_x(k: f32) -> Mat4 {
    let mut m = IDENTITY;
    m[1][0] = k;
    m
}

/// y' = y + k·x
pub fn shear_y(k: f32) -> Mat4 {
    let mut m = IDENTITY;
    m[0][1] = k;
    m
}

/// Same factor on x, y and z; w untouched.
pub fn uniform_scale(factor: f32) -> Mat4 {
    let mut m = IDENTITY;
    m[0][0] = factor;
    m[1][1] = factor;
    m[2][2] = factor;
    m
}

/// Orthographic projection mapping the box `[l, r] × [b, t] × [n, f]` onto
/// clip space, using the OpenGL-style `-2 / (f - n)` depth term.
pub fn ortho(l: f32, r: f32, b: f32, t: f32, n: f32, f: f32) -> Mat4 {
    let mut m = [[0.0f32; 4]; 4];
    m[0][0] = 2.0 / (r - l);
    m[1][1] = 2.0 / (t - b);
    m[2][2] = -2.0 / (f - n);
    m[3][0] = -(r + l) / (r - l);
    m[3][1] = -(t + b) / (t - b);
    m[3][2] = -(f + n) / (f - n);
    m[3][3] = 1.0;
    m
}

/// Transform the point `(x, y, 0, 1)` and return the resulting `(x, y)`.
pub fn transform_point(m: &Mat4, x: f32, y: f32) -> [f32; 2] {
    [
        m[0][0] * x + m[1][0] * y + m[3][0],
        m[0][1] * x + m[1][1] * y + m[3][1],
    ]
}

/// Element-wise comparison within `eps`.
pub fn approx_eq(a: &Mat4, b: &Mat4, eps: f32) -> bool {
    a.iter()
        .flatten()
        .zip(b.iter().flatten())
        .all(|(x, y)| (x - y).abs() <= eps)
}
