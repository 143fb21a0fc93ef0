//! OCV table for the LG E60 8s3p module
//!
//! 1001 points, SOC 0% to 100% in 0.1% steps, cell voltage at 25 °C.
//! The charge and discharge curves of this module are identical in the
//! manufacturer data, so one table backs both directions.

/// Cell OCV in volts, index / 10 = SOC %
#[rustfmt::skip]
pub const LG_E60_OCV: [f32; 1001] = [
    3.261, 3.267, 3.272, 3.278, 3.283, 3.288, 3.294, 3.299, 3.303, 3.308, // 0%
    3.313, 3.317, 3.322, 3.326, 3.33, 3.335, 3.339, 3.343, 3.346, 3.35, // 1%
    3.354, 3.357, 3.361, 3.364, 3.367, 3.37, 3.374, 3.377, 3.379, 3.382, // 2%
    3.385, 3.388, 3.39, 3.393, 3.395, 3.398, 3.4, 3.402, 3.404, 3.406, // 3%
    3.408, 3.41, 3.412, 3.414, 3.416, 3.417, 3.419, 3.421, 3.422, 3.424, // 4%
    3.425, 3.426, 3.428, 3.429, 3.43, 3.431, 3.433, 3.434, 3.435, 3.436, // 5%
    3.437, 3.438, 3.439, 3.439, 3.44, 3.441, 3.442, 3.443, 3.443, 3.444, // 6%
    3.445, 3.445, 3.446, 3.447, 3.447, 3.448, 3.449, 3.449, 3.45, 3.45, // 7%
    3.451, 3.451, 3.452, 3.453, 3.453, 3.454, 3.454, 3.455, 3.455, 3.456, // 8%
    3.456, 3.457, 3.458, 3.458, 3.459, 3.46, 3.46, 3.461, 3.462, 3.462, // 9%
    3.463, 3.464, 3.465, 3.465, 3.466, 3.467, 3.468, 3.469, 3.47, 3.471, // 10%
    3.472, 3.473, 3.474, 3.475, 3.476, 3.477, 3.478, 3.479, 3.48, 3.481, // 11%
    3.482, 3.483, 3.484, 3.485, 3.487, 3.488, 3.489, 3.49, 3.491, 3.492, // 12%
    3.494, 3.495, 3.496, 3.497, 3.498, 3.499, 3.501, 3.502, 3.503, 3.504, // 13%
    3.505, 3.507, 3.508, 3.509, 3.51, 3.511, 3.512, 3.514, 3.515, 3.516, // 14%
    3.517, 3.518, 3.519, 3.52, 3.521, 3.522, 3.524, 3.525, 3.526, 3.527, // 15%
    3.528, 3.529, 3.53, 3.531, 3.532, 3.533, 3.534, 3.535, 3.536, 3.537, // 16%
    3.538, 3.539, 3.539, 3.54, 3.541, 3.542, 3.543, 3.544, 3.545, 3.546, // 17%
    3.547, 3.548, 3.548, 3.549, 3.55, 3.551, 3.552, 3.553, 3.553, 3.554, // 18%
    3.555, 3.556, 3.557, 3.558, 3.558, 3.559, 3.56, 3.561, 3.561, 3.562, // 19%
    3.563, 3.564, 3.565, 3.565, 3.566, 3.567, 3.568, 3.568, 3.569, 3.57, // 20%
    3.57, 3.571, 3.572, 3.573, 3.573, 3.574, 3.575, 3.575, 3.576, 3.577, // 21%
    3.577, 3.578, 3.579, 3.579, 3.58, 3.581, 3.581, 3.582, 3.583, 3.583, // 22%
    3.584, 3.585, 3.585, 3.586, 3.587, 3.587, 3.588, 3.588, 3.589, 3.59, // 23%
    3.59, 3.591, 3.591, 3.592, 3.593, 3.593, 3.594, 3.594, 3.595, 3.595, // 24%
    3.596, 3.597, 3.597, 3.598, 3.598, 3.599, 3.599, 3.6, 3.6, 3.601, // 25%
    3.601, 3.602, 3.602, 3.603, 3.603, 3.604, 3.604, 3.605, 3.605, 3.606, // 26%
    3.606, 3.607, 3.607, 3.608, 3.608, 3.609, 3.609, 3.61, 3.61, 3.611, // 27%
    3.611, 3.612, 3.612, 3.613, 3.613, 3.614, 3.614, 3.614, 3.615, 3.615, // 28%
    3.616, 3.616, 3.617, 3.617, 3.617, 3.618, 3.618, 3.619, 3.619, 3.62, // 29%
    3.62, 3.62, 3.621, 3.621, 3.622, 3.622, 3.622, 3.623, 3.623, 3.624, // 30%
    3.624, 3.624, 3.625, 3.625, 3.626, 3.626, 3.626, 3.627, 3.627, 3.628, // 31%
    3.628, 3.628, 3.629, 3.629, 3.629, 3.63, 3.63, 3.631, 3.631, 3.631, // 32%
    3.632, 3.632, 3.632, 3.633, 3.633, 3.634, 3.634, 3.634, 3.635, 3.635, // 33%
    3.635, 3.636, 3.636, 3.636, 3.637, 3.637, 3.638, 3.638, 3.638, 3.639, // 34%
    3.639, 3.639, 3.64, 3.64, 3.64, 3.641, 3.641, 3.641, 3.642, 3.642, // 35%
    3.642, 3.643, 3.643, 3.643, 3.644, 3.644, 3.644, 3.645, 3.645, 3.645, // 36%
    3.646, 3.646, 3.646, 3.647, 3.647, 3.648, 3.648, 3.648, 3.649, 3.649, // 37%
    3.649, 3.65, 3.65, 3.65, 3.651, 3.651, 3.651, 3.652, 3.652, 3.652, // 38%
    3.653, 3.653, 3.653, 3.654, 3.654, 3.654, 3.655, 3.655, 3.655, 3.656, // 39%
    3.656, 3.656, 3.657, 3.657, 3.657, 3.658, 3.658, 3.658, 3.659, 3.659, // 40%
    3.659, 3.66, 3.66, 3.661, 3.661, 3.661, 3.662, 3.662, 3.662, 3.663, // 41%
    3.663, 3.663, 3.664, 3.664, 3.665, 3.665, 3.665, 3.666, 3.666, 3.667, // 42%
    3.667, 3.667, 3.668, 3.668, 3.669, 3.669, 3.669, 3.67, 3.67, 3.671, // 43%
    3.671, 3.672, 3.672, 3.672, 3.673, 3.673, 3.674, 3.674, 3.675, 3.675, // 44%
    3.676, 3.676, 3.677, 3.677, 3.678, 3.678, 3.679, 3.679, 3.68, 3.68, // 45%
    3.681, 3.681, 3.682, 3.683, 3.683, 3.684, 3.684, 3.685, 3.686, 3.686, // 46%
    3.687, 3.687, 3.688, 3.689, 3.689, 3.69, 3.691, 3.691, 3.692, 3.693, // 47%
    3.693, 3.694, 3.695, 3.695, 3.696, 3.697, 3.698, 3.698, 3.699, 3.7, // 48%
    3.701, 3.701, 3.702, 3.703, 3.704, 3.705, 3.706, 3.706, 3.707, 3.708, // 49%
    3.709, 3.71, 3.711, 3.712, 3.713, 3.714, 3.714, 3.715, 3.716, 3.717, // 50%
    3.718, 3.719, 3.72, 3.721, 3.722, 3.723, 3.724, 3.725, 3.726, 3.727, // 51%
    3.728, 3.73, 3.731, 3.732, 3.733, 3.734, 3.735, 3.736, 3.737, 3.738, // 52%
    3.739, 3.741, 3.742, 3.743, 3.744, 3.745, 3.746, 3.747, 3.749, 3.75, // 53%
    3.751, 3.752, 3.753, 3.754, 3.756, 3.757, 3.758, 3.759, 3.76, 3.762, // 54%
    3.763, 3.764, 3.765, 3.766, 3.768, 3.769, 3.77, 3.771, 3.772, 3.774, // 55%
    3.775, 3.776, 3.777, 3.779, 3.78, 3.781, 3.782, 3.783, 3.785, 3.786, // 56%
    3.787, 3.788, 3.79, 3.791, 3.792, 3.793, 3.795, 3.796, 3.797, 3.798, // 57%
    3.799, 3.801, 3.802, 3.803, 3.804, 3.805, 3.807, 3.808, 3.809, 3.81, // 58%
    3.811, 3.813, 3.814, 3.815, 3.816, 3.817, 3.818, 3.82, 3.821, 3.822, // 59%
    3.823, 3.824, 3.825, 3.826, 3.828, 3.829, 3.83, 3.831, 3.832, 3.833, // 60%
    3.834, 3.835, 3.836, 3.837, 3.838, 3.84, 3.841, 3.842, 3.843, 3.844, // 61%
    3.845, 3.846, 3.847, 3.848, 3.849, 3.85, 3.851, 3.852, 3.853, 3.854, // 62%
    3.855, 3.856, 3.857, 3.858, 3.859, 3.86, 3.861, 3.862, 3.863, 3.864, // 63%
    3.865, 3.866, 3.867, 3.868, 3.869, 3.87, 3.871, 3.872, 3.873, 3.874, // 64%
    3.875, 3.876, 3.877, 3.878, 3.879, 3.88, 3.881, 3.882, 3.883, 3.884, // 65%
    3.884, 3.885, 3.886, 3.887, 3.888, 3.889, 3.89, 3.891, 3.892, 3.893, // 66%
    3.894, 3.895, 3.896, 3.897, 3.898, 3.899, 3.899, 3.9, 3.901, 3.902, // 67%
    3.903, 3.904, 3.905, 3.906, 3.907, 3.908, 3.909, 3.91, 3.911, 3.912, // 68%
    3.913, 3.914, 3.914, 3.915, 3.916, 3.917, 3.918, 3.919, 3.92, 3.921, // 69%
    3.922, 3.923, 3.924, 3.925, 3.926, 3.927, 3.928, 3.929, 3.93, 3.931, // 70%
    3.932, 3.933, 3.933, 3.934, 3.935, 3.936, 3.937, 3.938, 3.939, 3.94, // 71%
    3.941, 3.942, 3.943, 3.944, 3.945, 3.946, 3.947, 3.948, 3.949, 3.95, // 72%
    3.951, 3.952, 3.953, 3.954, 3.955, 3.956, 3.957, 3.958, 3.959, 3.96, // 73%
    3.961, 3.962, 3.963, 3.964, 3.965, 3.966, 3.967, 3.968, 3.969, 3.97, // 74%
    3.971, 3.972, 3.973, 3.974, 3.975, 3.976, 3.977, 3.978, 3.979, 3.98, // 75%
    3.981, 3.982, 3.983, 3.984, 3.985, 3.986, 3.987, 3.988, 3.989, 3.99, // 76%
    3.991, 3.992, 3.994, 3.995, 3.996, 3.997, 3.998, 3.999, 4.0, 4.001, // 77%
    4.002, 4.003, 4.004, 4.005, 4.006, 4.007, 4.008, 4.009, 4.01, 4.011, // 78%
    4.012, 4.013, 4.014, 4.016, 4.017, 4.018, 4.019, 4.02, 4.021, 4.022, // 79%
    4.023, 4.024, 4.025, 4.026, 4.027, 4.028, 4.029, 4.031, 4.032, 4.033, // 80%
    4.034, 4.035, 4.036, 4.037, 4.038, 4.039, 4.04, 4.041, 4.042, 4.043, // 81%
    4.044, 4.046, 4.047, 4.048, 4.049, 4.05, 4.051, 4.052, 4.053, 4.054, // 82%
    4.055, 4.056, 4.057, 4.058, 4.059, 4.061, 4.062, 4.063, 4.064, 4.065, // 83%
    4.066, 4.067, 4.068, 4.069, 4.07, 4.071, 4.072, 4.073, 4.074, 4.075, // 84%
    4.076, 4.077, 4.078, 4.079, 4.08, 4.081, 4.082, 4.083, 4.084, 4.085, // 85%
    4.086, 4.087, 4.088, 4.089, 4.09, 4.091, 4.092, 4.093, 4.094, 4.095, // 86%
    4.096, 4.097, 4.098, 4.099, 4.1, 4.101, 4.102, 4.103, 4.104, 4.105, // 87%
    4.106, 4.107, 4.108, 4.108, 4.109, 4.11, 4.111, 4.112, 4.113, 4.114, // 88%
    4.115, 4.115, 4.116, 4.117, 4.118, 4.119, 4.12, 4.121, 4.121, 4.122, // 89%
    4.123, 4.124, 4.125, 4.125, 4.126, 4.127, 4.128, 4.129, 4.129, 4.13, // 90%
    4.131, 4.132, 4.132, 4.133, 4.134, 4.135, 4.135, 4.136, 4.137, 4.138, // 91%
    4.138, 4.139, 4.14, 4.14, 4.141, 4.142, 4.143, 4.143, 4.144, 4.145, // 92%
    4.146, 4.146, 4.147, 4.148, 4.149, 4.149, 4.15, 4.151, 4.152, 4.152, // 93%
    4.153, 4.154, 4.155, 4.155, 4.156, 4.157, 4.158, 4.159, 4.159, 4.16, // 94%
    4.161, 4.162, 4.163, 4.163, 4.164, 4.165, 4.166, 4.167, 4.168, 4.169, // 95%
    4.17, 4.17, 4.171, 4.172, 4.173, 4.174, 4.175, 4.176, 4.177, 4.178, // 96%
    4.179, 4.18, 4.181, 4.182, 4.183, 4.184, 4.185, 4.187, 4.188, 4.189, // 97%
    4.19, 4.191, 4.192, 4.193, 4.195, 4.196, 4.197, 4.198, 4.199, 4.201, // 98%
    4.202, 4.203, 4.205, 4.206, 4.207, 4.209, 4.21, 4.212, 4.213, 4.215, // 99%
    4.216, // 100%
];
