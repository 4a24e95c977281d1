//! Reflection padding for 4-D tensors.

use burn::prelude::*;

/// Pad the two spatial dimensions of a `[N, C, H, W]` tensor by mirroring the
/// rows and columns adjacent to each border, excluding the border itself.
///
/// Equivalent to `pad(..., mode="reflect")` in common deep learning frameworks.
/// `pad` must be smaller than both spatial extents; a reflection cannot reach
/// past the opposite border.
pub fn reflect_pad_2d<B: Backend>(tensor: Tensor<B, 4>, pad: usize) -> Tensor<B, 4> {
    if pad == 0 {
        return tensor;
    }

    let [batch, channels, height, width] = tensor.dims();
    assert!(
        pad < height && pad < width,
        "reflection padding ({pad}) must be smaller than the spatial dimensions ({height}x{width})"
    );

    let top = tensor
        .clone()
        .slice([0..batch, 0..channels, 1..pad + 1, 0..width])
        .flip([2]);
    let bottom = tensor
        .clone()
        .slice([0..batch, 0..channels, height - pad - 1..height - 1, 0..width])
        .flip([2]);
    let tensor = Tensor::cat(vec![top, tensor, bottom], 2);

    let height = height + 2 * pad;
    let left = tensor
        .clone()
        .slice([0..batch, 0..channels, 0..height, 1..pad + 1])
        .flip([3]);
    let right = tensor
        .clone()
        .slice([0..batch, 0..channels, 0..height, width - pad - 1..width - 1])
        .flip([3]);

    Tensor::cat(vec![left, tensor, right], 3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::ndarray::NdArray;

    type TestBackend = NdArray<f32>;

    #[test]
    fn zero_padding_is_identity() {
        let device = Default::default();
        let tensor = Tensor::<TestBackend, 4>::from_floats([[[[1.0, 2.0], [3.0, 4.0]]]], &device);

        let padded = reflect_pad_2d(tensor.clone(), 0);
        assert_eq!(padded.dims(), tensor.dims());
    }

    #[test]
    fn mirrors_rows_and_columns_without_repeating_the_border() {
        let device = Default::default();
        let tensor = Tensor::<TestBackend, 4>::from_floats([[[[1.0, 2.0], [3.0, 4.0]]]], &device);

        let padded = reflect_pad_2d(tensor, 1);
        assert_eq!(padded.dims(), [1, 1, 4, 4]);

        let values = padded.into_data().to_vec::<f32>().unwrap();
        let expected = [
            4.0, 3.0, 4.0, 3.0, //
            2.0, 1.0, 2.0, 1.0, //
            4.0, 3.0, 4.0, 3.0, //
            2.0, 1.0, 2.0, 1.0, //
        ];
        assert_eq!(values, expected);
    }

    #[test]
    #[should_panic(expected = "reflection padding")]
    fn padding_must_stay_below_the_spatial_extent() {
        let device = Default::default();
        let tensor = Tensor::<TestBackend, 4>::zeros([1, 1, 3, 3], &device);
        reflect_pad_2d(tensor, 3);
    }
}
